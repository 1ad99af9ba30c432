//! # obot actions
//!
//! The feature actions shipped with obot:
//!
//! | Action    | Shortcut   | What it does                              |
//! |-----------|------------|-------------------------------------------|
//! | `inspiro` | `ainspire` | AI generated inspirational quotes         |
//! | `emo`     | `xmoji`    | Mash up two emojis                        |
//! | `nasa`    | `astron`   | NASA Astronomy Picture Of the Day         |
//!
//! Each action reads an `[actions.<name>]` config section, shares one
//! `reqwest::Client`, sends its own replies, and reports diagnostics only as
//! outcomes on the signal.
//!
//! ```rust,ignore
//! let client = obot_actions::build_client(Duration::from_secs(30))?;
//! let nasa = Nasa::new(client, config.action_config("nasa")?, "ob")?;
//! router.register("nasa", nasa, Some("NASA Astronomy Picture Of the Day"))?;
//! router.bind_shortcut("astron", "nasa")?;
//! ```

pub mod emo;
pub mod error;
pub mod http;
pub mod inspiro;
pub mod nasa;

#[cfg(test)]
pub(crate) mod testing;

pub use emo::{Emo, EmoConfig, EmojiTable};
pub use error::{SetupError, SetupResult};
pub use http::build_client;
pub use inspiro::{Inspiro, InspiroConfig};
pub use nasa::{Nasa, NasaConfig};
