// Sys Manager - Native List Buffers
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Owned views over variable-length list buffers allocated by the OS.
//!
//! The WLAN enumeration calls hand back a single allocation laid out as a
//! `u32` item count, a `u32` current index, and then `count` fixed-size
//! records back to back. The caller owns that allocation and must return it
//! with the matching free routine.
//!
//! [`NativeList`] takes ownership of such a pointer, bounds-checks every
//! record it reads, and releases the allocation exactly once when dropped.
//! Release therefore happens on every exit path, including a decode error
//! or an early return from the caller.

use std::ffi::c_void;
use std::marker::PhantomData;
use std::mem::size_of;
use std::ptr::NonNull;

use super::{NativeError, NativeResult};

/// Routine returning an OS allocation, e.g. `WlanFreeMemory`.
pub type ReleaseFn = unsafe fn(*mut c_void);

/// Size of the `dwNumberOfItems` + `dwIndex` header.
pub const LIST_HEADER_SIZE: usize = 8;

/// Upper bound on the item count accepted from a list header.
pub const MAX_LIST_ITEMS: usize = 4096;

/// A header-prefixed list of `T` records owned until drop.
pub struct NativeList<T> {
    ptr: NonNull<u8>,
    release: ReleaseFn,
    _marker: PhantomData<T>,
}

impl<T: Copy> NativeList<T> {
    /// Take ownership of an OS-allocated list.
    ///
    /// Returns `None` for a null pointer, which has nothing to release.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a list laid out as described in the
    /// module docs whose records are valid `T` values, and it must stay
    /// valid until `release` is invoked on it. Nothing else may free it.
    pub unsafe fn from_raw(ptr: *mut c_void, release: ReleaseFn) -> Option<Self> {
        NonNull::new(ptr.cast::<u8>()).map(|ptr| Self {
            ptr,
            release,
            _marker: PhantomData,
        })
    }

    /// Item count declared by the header.
    pub fn len(&self) -> usize {
        // SAFETY: from_raw guarantees at least a full header behind ptr.
        unsafe { self.ptr.as_ptr().cast::<u32>().read_unaligned() as usize }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out the record at `index`.
    pub fn get(&self, index: usize) -> NativeResult<T> {
        let count = self.checked_len()?;
        if index >= count {
            return Err(NativeError::Decode(format!(
                "record {} out of bounds for list of {}",
                index, count
            )));
        }
        let offset = LIST_HEADER_SIZE + index * size_of::<T>();
        // SAFETY: index < count and count <= MAX_LIST_ITEMS, so the offset
        // lies inside the allocation described by the header.
        Ok(unsafe { self.ptr.as_ptr().add(offset).cast::<T>().read_unaligned() })
    }

    /// Decode every record, keeping the `Some` results.
    ///
    /// The first error aborts decoding; the buffer is still released on drop.
    pub fn decode<R, F>(&self, mut decoder: F) -> NativeResult<Vec<R>>
    where
        F: FnMut(&T) -> NativeResult<Option<R>>,
    {
        let count = self.checked_len()?;
        let mut out = Vec::with_capacity(count);
        for index in 0..count {
            let record = self.get(index)?;
            if let Some(item) = decoder(&record)? {
                out.push(item);
            }
        }
        Ok(out)
    }

    fn checked_len(&self) -> NativeResult<usize> {
        let count = self.len();
        if count > MAX_LIST_ITEMS {
            return Err(NativeError::Decode(format!(
                "list header declares {} items (limit {})",
                count, MAX_LIST_ITEMS
            )));
        }
        Ok(count)
    }
}

impl<T> Drop for NativeList<T> {
    fn drop(&mut self) {
        // SAFETY: the pointer came from the allocator paired with `release`
        // and is released only here.
        unsafe { (self.release)(self.ptr.as_ptr().cast::<c_void>()) }
    }
}
