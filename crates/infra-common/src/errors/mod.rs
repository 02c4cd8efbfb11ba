/*!
Error Handling

Standardized error type for the Rewind infrastructure layer. Domain crates
keep their own error enums and convert into this one at the facade.
*/

pub mod types;

pub use types::{Error, Result};
