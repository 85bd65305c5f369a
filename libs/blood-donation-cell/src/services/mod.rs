pub mod lifecycle;
pub mod registry;

pub use lifecycle::DonationLifecycleService;
pub use registry::DonationRegistry;
