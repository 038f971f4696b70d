use core::panic::PanicInfo;

use crate::console::CONSOLE;

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    // Whoever held the console is never coming back.
    unsafe { CONSOLE.force_unlock() };

    kprintln!("\n\n---------- PANIC ----------");
    kprintln!("{}", info.message());
    if let Some(location) = info.location() {
        kprintln!("At file \"{}\", line {}", location.file(), location.line());
    }
    kprintln!("---------------------------");
    kprintln!("Strike RETURN to reboot");

    loop {
        if CONSOLE.lock().read_byte() == b'\r' {
            CONSOLE.lock().flush();
            unsafe { pi::power::PowerManager::new().reset() }
        }
    }
}
