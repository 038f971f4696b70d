#![cfg_attr(not(test), no_std)]

//! Volatile memory cells for memory-mapped registers.
//!
//! Each wrapper is `#[repr(transparent)]`, so a register block can be
//! described as a `#[repr(C)]` struct of wrappers and overlaid on the
//! peripheral's base address. The wrapper decides which accesses are legal:
//! `ReadVolatile` can only be read, `WriteVolatile` can only be written and
//! `Reserved` can be neither.

use core::ops::{BitAnd, BitOr, Not};
use core::ptr;

pub mod prelude {
    pub use super::{Readable, ReadableWriteable, Writeable};
}

/// Types whose contents can be read with a volatile load.
pub trait Readable<T: Copy> {
    /// Returns a raw pointer to the wrapped value.
    fn inner(&self) -> *const T;

    /// Performs a volatile read of the wrapped value.
    #[inline(always)]
    fn read(&self) -> T {
        unsafe { ptr::read_volatile(self.inner()) }
    }

    /// Returns `true` if any bit of `mask` is set in the current value.
    #[inline(always)]
    fn has_mask(&self, mask: T) -> bool
    where
        T: BitAnd<Output = T> + PartialEq + Default,
    {
        (self.read() & mask) != T::default()
    }
}

/// Types whose contents can be written with a volatile store.
pub trait Writeable<T: Copy> {
    /// Returns a raw mutable pointer to the wrapped value.
    fn inner(&mut self) -> *mut T;

    /// Performs a volatile write of `val`.
    #[inline(always)]
    fn write(&mut self, val: T) {
        unsafe { ptr::write_volatile(self.inner(), val) }
    }
}

/// Read-modify-write helpers for registers that are both readable and
/// writeable.
pub trait ReadableWriteable<T>: Readable<T> + Writeable<T>
where
    T: Copy + BitOr<Output = T> + BitAnd<Output = T> + Not<Output = T>,
{
    /// Sets every bit of `mask`.
    #[inline(always)]
    fn or_mask(&mut self, mask: T) {
        let init = Readable::read(self);
        Writeable::write(self, init | mask);
    }

    /// Keeps only the bits of `mask`.
    #[inline(always)]
    fn and_mask(&mut self, mask: T) {
        let init = Readable::read(self);
        Writeable::write(self, init & mask);
    }
}

/// A readable and writeable volatile cell.
#[repr(transparent)]
pub struct Volatile<T>(T);

/// A read-only volatile cell.
#[repr(transparent)]
pub struct ReadVolatile<T>(T);

/// A write-only volatile cell.
#[repr(transparent)]
pub struct WriteVolatile<T>(T);

/// Padding between registers. Cannot be accessed.
#[repr(transparent)]
pub struct Reserved<T>(T);

impl<T> Volatile<T> {
    /// Reinterprets the raw pointer `ptr` as a reference to a volatile cell.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `T` for the lifetime `'a`.
    pub unsafe fn from_ptr<'a>(ptr: *mut T) -> &'a mut Volatile<T> {
        &mut *(ptr as *mut Volatile<T>)
    }
}

impl<T> ReadVolatile<T> {
    /// Reinterprets the raw pointer `ptr` as a reference to a read-only cell.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `T` for the lifetime `'a`.
    pub unsafe fn from_ptr<'a>(ptr: *const T) -> &'a ReadVolatile<T> {
        &*(ptr as *const ReadVolatile<T>)
    }
}

impl<T: Copy> Readable<T> for Volatile<T> {
    #[inline(always)]
    fn inner(&self) -> *const T {
        &self.0 as *const T
    }
}

impl<T: Copy> Writeable<T> for Volatile<T> {
    #[inline(always)]
    fn inner(&mut self) -> *mut T {
        &mut self.0 as *mut T
    }
}

impl<T> ReadableWriteable<T> for Volatile<T> where
    T: Copy + BitOr<Output = T> + BitAnd<Output = T> + Not<Output = T>
{
}

impl<T: Copy> Readable<T> for ReadVolatile<T> {
    #[inline(always)]
    fn inner(&self) -> *const T {
        &self.0 as *const T
    }
}

impl<T: Copy> Writeable<T> for WriteVolatile<T> {
    #[inline(always)]
    fn inner(&mut self) -> *mut T {
        &mut self.0 as *mut T
    }
}
