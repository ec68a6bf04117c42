pub mod ancestry;
pub mod path;
pub mod segment;

pub use ancestry::{AncestorPath, AncestryWalker, ResolvedPath, Termination};
pub use path::{AliasPath, PATH_SEPARATOR};
pub use segment::{AnchorCleaner, SegmentResolver, SlugCleaner};
