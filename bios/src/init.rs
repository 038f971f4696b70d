use core::arch::global_asm;

mod panic;

// Core 0 zeroes .bss and enters Rust on a stack that grows down from the
// load address; the other cores park.
global_asm!(
    r#"
.section .text.init
.global _start
_start:
    mrs     x1, MPIDR_EL1
    and     x1, x1, #3
    cbz     x1, 2f
1:  wfe
    b       1b
2:  ldr     x1, =_start
    mov     sp, x1
    ldr     x1, =__bss_start
    ldr     x2, =__bss_end
3:  cmp     x1, x2
    b.hs    4f
    str     xzr, [x1], #8
    b       3b
4:  bl      kinit
    b       1b
"#
);

#[no_mangle]
pub unsafe extern "C" fn kinit() -> ! {
    crate::kmain()
}
