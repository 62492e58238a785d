pub mod projection;
pub mod scaling;
pub mod simplify;

pub use projection::{Aspect, Projector};
pub use scaling::{Bounds, Margins, Scaler};
pub use simplify::{calculate_epsilon, simplify_outline};
