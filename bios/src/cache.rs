use core::arch::asm;

const LINE: usize = 64;

/// Writes back and invalidates every data cache line covering
/// `addr..addr + length`.
pub fn clean_invalidate_dcache(addr: usize, length: usize) {
    let start = addr & !(LINE - 1);
    let end = addr.saturating_add(length).saturating_add(LINE - 1) & !(LINE - 1);
    unsafe {
        asm!("dmb sy");
        for line in (start..end).step_by(LINE) {
            clean_invalidate_line(line);
        }
        asm!("dsb sy", "isb");
    }
}

/// Writes back and invalidates the data cache line holding `addr`.
///
/// # Safety
///
/// `addr` must be mapped.
#[inline(always)]
pub unsafe fn clean_invalidate_line(addr: usize) {
    asm!("dc civac, {}", in(reg) addr, options(nostack));
}

pub fn clear_icache() {
    unsafe {
        asm!("dsb sy", "isb", "ic iallu", "dsb sy", "isb", options(nostack));
    }
}
