// Sys Manager - WLAN Profile Documents
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Synthesizes WLAN profile documents for new connections.
//!
//! The document names the network, carries the SSID both as UTF-8 hex and as
//! text, fixes the connection type to infrastructure (ESS) with automatic
//! connection, and embeds the passphrase in cleartext inside the security
//! block. The OS encrypts the key material once the profile is stored.

use std::fmt::Write as _;
use zeroize::Zeroizing;

use crate::models::{AuthAlgorithm, CipherAlgorithm};

/// Namespace of the WLAN profile schema.
pub const WLAN_PROFILE_NAMESPACE: &str = "http://www.microsoft.com/networking/WLAN/profile/v1";

/// Uppercase hex of the SSID's UTF-8 bytes.
pub fn ssid_hex(ssid: &str) -> String {
    ssid.bytes().fold(String::with_capacity(ssid.len() * 2), |mut out, b| {
        let _ = write!(out, "{:02X}", b);
        out
    })
}

/// Escape the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build a personal (pre-shared key) profile document for `ssid`.
///
/// The profile is named after the SSID. The returned document contains the
/// passphrase and is wiped from memory when dropped.
pub fn profile_document(
    ssid: &str,
    passphrase: &str,
    auth: AuthAlgorithm,
    cipher: CipherAlgorithm,
) -> Zeroizing<String> {
    let name = escape_xml(ssid);
    let key = Zeroizing::new(escape_xml(passphrase));

    Zeroizing::new(format!(
        r#"<?xml version="1.0"?>
<WLANProfile xmlns="{namespace}">
    <name>{name}</name>
    <SSIDConfig>
        <SSID>
            <hex>{hex}</hex>
            <name>{name}</name>
        </SSID>
    </SSIDConfig>
    <connectionType>ESS</connectionType>
    <connectionMode>auto</connectionMode>
    <MSM>
        <security>
            <authEncryption>
                <authentication>{auth}</authentication>
                <encryption>{cipher}</encryption>
                <useOneX>false</useOneX>
            </authEncryption>
            <sharedKey>
                <keyType>passPhrase</keyType>
                <protected>false</protected>
                <keyMaterial>{key}</keyMaterial>
            </sharedKey>
        </security>
    </MSM>
</WLANProfile>"#,
        namespace = WLAN_PROFILE_NAMESPACE,
        name = name,
        hex = ssid_hex(ssid),
        auth = auth.profile_keyword(),
        cipher = cipher.profile_keyword(),
        key = key.as_str(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssid_hex() {
        assert_eq!(ssid_hex("Home"), "486F6D65");
        assert_eq!(ssid_hex("Café"), "436166C3A9");
        assert_eq!(ssid_hex(""), "");
    }

    #[test]
    fn test_document_fields() {
        let doc = profile_document("Home", "hunter22", AuthAlgorithm::RsnaPsk, CipherAlgorithm::Ccmp);
        assert!(doc.contains("<name>Home</name>"));
        assert!(doc.contains("<hex>486F6D65</hex>"));
        assert!(doc.contains("<connectionType>ESS</connectionType>"));
        assert!(doc.contains("<connectionMode>auto</connectionMode>"));
        assert!(doc.contains("<authentication>WPA2PSK</authentication>"));
        assert!(doc.contains("<encryption>AES</encryption>"));
        assert!(doc.contains("<keyMaterial>hunter22</keyMaterial>"));
        assert!(doc.contains(WLAN_PROFILE_NAMESPACE));
    }

    #[test]
    fn test_unrecognized_security_defaults() {
        let doc = profile_document("Lab", "pw", AuthAlgorithm::Other(77), CipherAlgorithm::Other(9));
        assert!(doc.contains("<authentication>WPA2PSK</authentication>"));
        assert!(doc.contains("<encryption>AES</encryption>"));

        let doc = profile_document("Old", "pw", AuthAlgorithm::WpaPsk, CipherAlgorithm::Tkip);
        assert!(doc.contains("<authentication>WPAPSK</authentication>"));
        assert!(doc.contains("<encryption>TKIP</encryption>"));
    }

    #[test]
    fn test_special_characters_escaped() {
        let doc = profile_document("Tom & Jerry's", "a<b>\"c", AuthAlgorithm::Wpa3Sae, CipherAlgorithm::Ccmp);
        assert!(doc.contains("<name>Tom &amp; Jerry&apos;s</name>"));
        assert!(doc.contains("<keyMaterial>a&lt;b&gt;&quot;c</keyMaterial>"));
        // Hex carries the raw bytes, not the escaped text.
        assert!(doc.contains(&format!("<hex>{}</hex>", ssid_hex("Tom & Jerry's"))));
    }
}
