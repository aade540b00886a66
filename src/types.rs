//! A home for the small enums and value types scattered across the other
//! modules, so that doc links and fully qualified paths have one place to
//! point to regardless of which module actually defines a given type.

pub use crate::actions::ActionType;
pub use crate::annotations::AnnotationType;
pub use crate::content::RenderingIntent;
pub use crate::object::Date;
