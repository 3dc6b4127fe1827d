//! Regular expression testing core: pattern group structure, match records,
//! match/group navigation and highlight planning.
//!
//! # Example
//!
//! ```rust
//! use regexpy::{Configuration, Move, OptionFlags, Session};
//!
//! let mut session = Session::new(Configuration::default());
//! session.compile(r"(?P<key>\w+)=(\w+)", OptionFlags::default()).unwrap();
//!
//! let report = session.search("a=1 b=2").unwrap();
//! assert_eq!(report.match_count, 2);
//!
//! // Step into the first match's groups
//! let event = session.navigate(Move::NextGroup).unwrap();
//! assert_eq!(event.annotation.to_string(), "[1] group key");
//! assert_eq!(event.offset, 0);
//!
//! let event = session.navigate(Move::NextGroup).unwrap();
//! assert_eq!(event.annotation.to_string(), "[1] group 2");
//! assert_eq!(event.offset, 2);
//! ```

pub mod app;
pub mod colour;
pub mod config;
pub mod flags;
pub mod highlight;
pub mod keybind;
pub mod locate;
pub mod markers;
pub mod navigation;
pub mod pattern;
pub mod record;
pub mod render;
pub mod session;
pub mod terminal;

pub use colour::Colour;
pub use config::{Configuration, Loader, Palette};
pub use flags::OptionFlags;
pub use highlight::{HighlightInstruction, HighlightPlanner, Role};
pub use locate::{Location, locate};
pub use navigation::{Annotation, Move, NavigationState, Navigator, PositionChanged};
pub use pattern::{Expression, GroupLabel, PatternError, PatternGroup, PatternStructure};
pub use record::{Group, Match};
pub use session::{SearchReport, Session, Validity};
