//! Console logging
//!
//! On wasm32 messages go to the browser console through `web_sys`.
//! Native builds (tests, tools) print to stderr instead.

#[doc(hidden)]
pub fn write_line(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::console::log_1(&msg.into());
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        eprintln!("{}", msg);
    }
}

/// `format!`-style logging to the console.
///
/// ```rust
/// use askew_engine::console_log;
///
/// let id = 3;
/// console_log!("sloth {} spawned", id);
/// ```
#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => {
        $crate::core::utils::log::write_line(&format!($($arg)*))
    };
}
