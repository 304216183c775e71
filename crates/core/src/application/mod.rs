// Application Layer - Use Cases and Business Logic

pub mod allocator;
pub mod desk;
pub mod export;
pub mod schedule_controller;
pub mod shutdown;
pub mod ticker;

// Re-exports
pub use allocator::QueueAllocator;
pub use desk::{QueueDesk, QueueStats};
pub use export::CsvExport;
pub use schedule_controller::{ScheduleController, Transition};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use ticker::{ScheduleTicker, DEFAULT_TICK_INTERVAL};
