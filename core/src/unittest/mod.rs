pub mod loopback;

pub mod setup {
    pub mod log {
        use std::sync::Once;
        static SETUP: Once = Once::new();
        pub fn configure() {
            configure_level(log::LevelFilter::Trace)
        }
        pub fn configure_level(level: log::LevelFilter) {
            SETUP.call_once(|| {
                use colored::*;
                use std::io::Write;
                let _ = env_logger::builder()
                    .format(|buf, record| {
                        let ts = buf.timestamp_nanos();
                        let level = match record.level() {
                            log::Level::Error => "ERROR".red(),
                            log::Level::Warn => "WARN ".yellow(),
                            log::Level::Info => "INFO ".green(),
                            log::Level::Debug => "DEBUG".blue(),
                            log::Level::Trace => "TRACE".blue(),
                        };
                        let target = record.target();
                        let args = record.args();
                        let thread = std::thread::current();
                        let name = thread.name().map(str::to_owned).unwrap_or_else(|| format!("Thread-{:?}", thread.id()));
                        writeln!(buf, "{ts} {level} ({name}) {target} {args}")
                    })
                    .is_test(false) // disables color in the terminal
                    .filter_level(level)
                    .try_init();
            });
        }
    }

    /// Session parameters shared by tests and examples.
    pub mod model {
        pub const FRONT_ADDRESS: &str = "tcp://127.0.0.1:7001";
        pub const APP_ID: &str = "X1";
        pub const AUTH_CODE: &str = "AUTH1";
        pub const BROKER_ID: &str = "9999";
        pub const USER_ID: &str = "user1";
        pub const PASSWORD: &str = "pass1";
        pub const TRADING_DAY: &str = "20261019";
    }

    pub mod transport {
        pub use crate::unittest::loopback::{LoopbackState, LoopbackTransport, Submitted};
    }

    pub mod wait {
        use std::time::Duration;

        pub fn default_reply_timeout() -> Duration {
            Duration::from_millis(500)
        }
        pub fn default_connect_timeout() -> Duration {
            Duration::from_millis(500)
        }
    }
}
