pub mod auth;
pub mod director;
pub mod donation;
pub mod event;
pub mod gallery;
pub mod inquiry;
pub mod mailer;
pub mod media;
pub mod user;

pub use auth::AuthService;
pub use director::DirectorService;
pub use donation::DonationService;
pub use event::EventService;
pub use gallery::GalleryService;
pub use inquiry::InquiryService;
pub use mailer::{Mailer, Notification, NotificationOutcome};
pub use media::{MediaLifecycle, Upload};
pub use user::UserService;
