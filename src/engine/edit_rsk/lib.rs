mod picker;
pub use picker::*;

mod selection;
pub use selection::*;

mod history;
pub use history::*;

mod config;
pub use config::*;

mod session;
pub use session::*;
