mod model;
mod query;
mod ray;

pub use model::Contact;
pub use model::SurfaceHit;
pub use query::altitude;
pub use query::ground_contact;
pub use query::locate_many;
pub use query::nearest_in_leaf;
pub use query::pick_nearest;
pub use query::raycast_first_many;
pub use ray::Ray;
pub use ray::RayRange;
