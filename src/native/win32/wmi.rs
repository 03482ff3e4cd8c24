// Sys Manager - Desktop Management Brightness (Windows)
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

use windows::core::{BSTR, PCWSTR, VARIANT, w};
use windows::Win32::System::Com::{CoCreateInstance, CoTaskMemFree, CLSCTX_INPROC_SERVER};
use windows::Win32::System::Variant::{
    VariantGetElementCount, VariantGetUInt32Elem, VariantToStringAlloc, VariantToUInt32,
};
use windows::Win32::System::Wmi::{
    IWbemClassObject, IWbemLocator, IWbemServices, WbemLocator, WBEM_FLAG_FORWARD_ONLY,
    WBEM_FLAG_RETURN_IMMEDIATELY, WBEM_INFINITE,
};

use super::{ComApartment, ComResultExt};
use crate::native::monitor::DesktopBrightnessApi;
use crate::native::{NativeError, NativeResult};

const WMI_NAMESPACE: &str = "root\\wmi";

/// Brightness through the `root\wmi` monitor brightness classes.
///
/// Each call connects afresh, so nothing is held between calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct WmiBrightness;

struct Connection {
    services: IWbemServices,
    // Dropped after `services`.
    _apartment: ComApartment,
}

impl Connection {
    fn open() -> NativeResult<Self> {
        let apartment = ComApartment::enter();
        // SAFETY: COM is initialized on this thread for the connection's lifetime.
        let services = unsafe {
            let locator: IWbemLocator =
                CoCreateInstance(&WbemLocator, None, CLSCTX_INPROC_SERVER).native("CoCreateInstance")?;
            locator
                .ConnectServer(
                    &BSTR::from(WMI_NAMESPACE),
                    &BSTR::new(),
                    &BSTR::new(),
                    &BSTR::new(),
                    0,
                    &BSTR::new(),
                    None,
                )
                .native("IWbemLocator::ConnectServer")?
        };
        Ok(Self {
            services,
            _apartment: apartment,
        })
    }

    /// First instance returned by a WQL query, if any.
    fn first(&self, query: &str) -> NativeResult<Option<IWbemClassObject>> {
        // SAFETY: services is a live connection.
        unsafe {
            let results = self
                .services
                .ExecQuery(
                    &BSTR::from("WQL"),
                    &BSTR::from(query),
                    WBEM_FLAG_FORWARD_ONLY | WBEM_FLAG_RETURN_IMMEDIATELY,
                    None,
                )
                .native("IWbemServices::ExecQuery")?;

            let mut objects = [None];
            let mut returned = 0u32;
            results
                .Next(WBEM_INFINITE, &mut objects, &mut returned)
                .ok()
                .native("IEnumWbemClassObject::Next")?;
            if returned == 0 {
                return Ok(None);
            }
            let [object] = objects;
            Ok(object)
        }
    }
}

fn property(object: &IWbemClassObject, name: PCWSTR) -> NativeResult<VARIANT> {
    let mut value = VARIANT::default();
    // SAFETY: value is a valid out-parameter.
    unsafe { object.Get(name, 0, &mut value, None, None) }.native("IWbemClassObject::Get")?;
    Ok(value)
}

fn variant_string(value: &VARIANT) -> NativeResult<String> {
    // SAFETY: the returned buffer is freed below.
    unsafe {
        let text = VariantToStringAlloc(value).native("VariantToStringAlloc")?;
        let result = text
            .to_string()
            .map_err(|e| NativeError::Decode(e.to_string()));
        CoTaskMemFree(Some(text.0 as *const _));
        result
    }
}

impl DesktopBrightnessApi for WmiBrightness {
    fn current_brightness(&self) -> NativeResult<Option<u32>> {
        let connection = Connection::open()?;
        let Some(instance) = connection.first("SELECT CurrentBrightness FROM WmiMonitorBrightness")? else {
            return Ok(None);
        };
        let value = property(&instance, w!("CurrentBrightness"))?;
        // SAFETY: value is an initialized VARIANT.
        let brightness = unsafe { VariantToUInt32(&value) }.native("VariantToUInt32")?;
        Ok(Some(brightness))
    }

    fn set_brightness(&self, percent: u32) -> NativeResult<()> {
        let connection = Connection::open()?;
        let instance = connection
            .first("SELECT * FROM WmiMonitorBrightnessMethods")?
            .ok_or(NativeError::empty("WmiMonitorBrightnessMethods"))?;
        let path = variant_string(&property(&instance, w!("__PATH"))?)?;

        // SAFETY: every interface used below comes from the live connection.
        unsafe {
            let mut class = None;
            connection
                .services
                .GetObject(&BSTR::from("WmiMonitorBrightnessMethods"), 0, None, Some(&mut class), None)
                .native("IWbemServices::GetObject")?;
            let class: IWbemClassObject = class.ok_or(NativeError::empty("IWbemServices::GetObject"))?;

            let mut signature = None;
            class
                .GetMethod(w!("WmiSetBrightness"), 0, &mut signature, std::ptr::null_mut())
                .native("IWbemClassObject::GetMethod")?;
            let signature: IWbemClassObject =
                signature.ok_or(NativeError::empty("IWbemClassObject::GetMethod"))?;

            let arguments = signature.SpawnInstance(0).native("IWbemClassObject::SpawnInstance")?;
            arguments
                .Put(w!("Timeout"), 0, &VARIANT::from(1i32), 0)
                .native("IWbemClassObject::Put")?;
            arguments
                .Put(w!("Brightness"), 0, &VARIANT::from(percent.min(100) as u8), 0)
                .native("IWbemClassObject::Put")?;

            connection
                .services
                .ExecMethod(
                    &BSTR::from(path),
                    &BSTR::from("WmiSetBrightness"),
                    0,
                    None,
                    Some(&arguments),
                    None,
                    None,
                )
                .native("IWbemServices::ExecMethod")?;
        }
        Ok(())
    }

    fn brightness_levels(&self) -> NativeResult<Option<Vec<u8>>> {
        let connection = Connection::open()?;
        let Some(instance) = connection.first("SELECT Level FROM WmiMonitorBrightnessLevels")? else {
            return Ok(None);
        };
        let value = property(&instance, w!("Level"))?;

        // SAFETY: value is an initialized VARIANT holding the level array.
        unsafe {
            let count = VariantGetElementCount(&value);
            let mut levels = Vec::with_capacity(count as usize);
            for index in 0..count {
                let level = VariantGetUInt32Elem(&value, index).native("VariantGetUInt32Elem")?;
                levels.push(level.min(100) as u8);
            }
            Ok(Some(levels))
        }
    }
}
