// Sys Manager - Settings Pages
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! OS settings pages and helper executables.
//!
//! Each page has a primary shell target and, for most pages, a fallback
//! that is tried when the primary launch fails. A fallback is either a
//! classic control panel command or another page.

use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::native::shell::Launcher;

/// A shell target with optional arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchTarget {
    pub target: &'static str,
    pub arguments: Option<&'static str>,
}

impl LaunchTarget {
    const fn uri(target: &'static str) -> Self {
        Self { target, arguments: None }
    }

    const fn command(target: &'static str, arguments: &'static str) -> Self {
        Self { target, arguments: Some(arguments) }
    }
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arguments {
            Some(args) => write!(f, "{} {}", self.target, args),
            None => f.write_str(self.target),
        }
    }
}

/// What to try when a page's primary target fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Target(LaunchTarget),
    Page(SettingsPage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsPage {
    /// Wi-Fi settings.
    Network,
    /// Available networks flyout.
    WifiFlyout,
    Vpn,
    Bluetooth,
    /// Bluetooth file transfer / pairing wizard.
    PairingWizard,
    Sound,
    VolumeMixer,
}

impl SettingsPage {
    pub const ALL: [SettingsPage; 7] = [
        Self::Network,
        Self::WifiFlyout,
        Self::Vpn,
        Self::Bluetooth,
        Self::PairingWizard,
        Self::Sound,
        Self::VolumeMixer,
    ];

    /// Name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::WifiFlyout => "wifi-flyout",
            Self::Vpn => "vpn",
            Self::Bluetooth => "bluetooth",
            Self::PairingWizard => "pairing",
            Self::Sound => "sound",
            Self::VolumeMixer => "mixer",
        }
    }

    pub fn primary(&self) -> LaunchTarget {
        match self {
            Self::Network => LaunchTarget::uri("ms-settings:network-wifi"),
            Self::WifiFlyout => LaunchTarget::uri("ms-availablenetworks:"),
            Self::Vpn => LaunchTarget::uri("ms-settings:network-vpn"),
            Self::Bluetooth => LaunchTarget::uri("ms-settings:bluetooth"),
            Self::PairingWizard => LaunchTarget::uri("fsquirt.exe"),
            Self::Sound => LaunchTarget::uri("ms-settings:sound"),
            Self::VolumeMixer => LaunchTarget::uri("sndvol.exe"),
        }
    }

    pub fn fallback(&self) -> Option<Fallback> {
        match self {
            Self::Network => Some(Fallback::Target(LaunchTarget::uri("ncpa.cpl"))),
            Self::WifiFlyout => Some(Fallback::Page(Self::Network)),
            Self::Bluetooth => Some(Fallback::Target(LaunchTarget::command("control", "bthprops.cpl"))),
            Self::PairingWizard => Some(Fallback::Page(Self::Bluetooth)),
            Self::Sound => Some(Fallback::Target(LaunchTarget::command("control", "mmsys.cpl sounds"))),
            Self::Vpn | Self::VolumeMixer => None,
        }
    }
}

impl fmt::Display for SettingsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingsPage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|page| page.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown settings page: {}", s))
    }
}

fn launch<L: Launcher>(launcher: &L, target: LaunchTarget) -> bool {
    match launcher.open(target.target, target.arguments) {
        Ok(()) => {
            debug!("Launched {}", target);
            true
        }
        Err(e) => {
            debug!("Failed to launch {}: {}", target, e);
            false
        }
    }
}

/// Open `page`, walking its fallback chain until one launch succeeds.
pub fn open_page<L: Launcher>(launcher: &L, page: SettingsPage) -> bool {
    if launch(launcher, page.primary()) {
        return true;
    }
    let opened = match page.fallback() {
        Some(Fallback::Target(target)) => launch(launcher, target),
        Some(Fallback::Page(next)) => open_page(launcher, next),
        None => false,
    };
    if !opened {
        warn!("Could not open {} settings", page);
    }
    opened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{NativeError, NativeResult};
    use std::cell::RefCell;

    /// Records every attempt; targets listed in `broken` fail.
    #[derive(Default)]
    struct FakeLauncher {
        broken: Vec<&'static str>,
        attempts: RefCell<Vec<String>>,
    }

    impl Launcher for FakeLauncher {
        fn open(&self, target: &str, arguments: Option<&str>) -> NativeResult<()> {
            let line = match arguments {
                Some(args) => format!("{} {}", target, args),
                None => target.to_string(),
            };
            self.attempts.borrow_mut().push(line);
            if self.broken.iter().any(|b| *b == target) {
                return Err(NativeError::status("ShellExecuteW", 2));
            }
            Ok(())
        }
    }

    #[test]
    fn test_primary_only_when_it_works() {
        let launcher = FakeLauncher::default();
        assert!(open_page(&launcher, SettingsPage::Sound));
        assert_eq!(*launcher.attempts.borrow(), vec!["ms-settings:sound"]);
    }

    #[test]
    fn test_control_panel_fallback() {
        let launcher = FakeLauncher {
            broken: vec!["ms-settings:bluetooth"],
            ..Default::default()
        };
        assert!(open_page(&launcher, SettingsPage::Bluetooth));
        assert_eq!(
            *launcher.attempts.borrow(),
            vec!["ms-settings:bluetooth", "control bthprops.cpl"]
        );
    }

    #[test]
    fn test_page_fallback_chain() {
        let launcher = FakeLauncher {
            broken: vec!["ms-availablenetworks:", "ms-settings:network-wifi"],
            ..Default::default()
        };
        assert!(open_page(&launcher, SettingsPage::WifiFlyout));
        assert_eq!(
            *launcher.attempts.borrow(),
            vec!["ms-availablenetworks:", "ms-settings:network-wifi", "ncpa.cpl"]
        );
    }

    #[test]
    fn test_no_fallback() {
        let launcher = FakeLauncher {
            broken: vec!["sndvol.exe"],
            ..Default::default()
        };
        assert!(!open_page(&launcher, SettingsPage::VolumeMixer));
        assert_eq!(launcher.attempts.borrow().len(), 1);
    }

    #[test]
    fn test_everything_broken() {
        let launcher = FakeLauncher {
            broken: vec!["fsquirt.exe", "ms-settings:bluetooth", "control"],
            ..Default::default()
        };
        assert!(!open_page(&launcher, SettingsPage::PairingWizard));
        assert_eq!(launcher.attempts.borrow().len(), 3);
    }

    #[test]
    fn test_page_names() {
        for page in SettingsPage::ALL {
            assert_eq!(page.name().parse::<SettingsPage>(), Ok(page));
        }
        assert!("printers".parse::<SettingsPage>().is_err());
    }
}
