pub mod slots;
pub mod normalizer;
pub mod matcher;
pub mod reconciler;
pub mod toggle;
pub mod session;
pub mod record;
pub mod store;
pub mod schedule;

pub use matcher::{match_slot, MatchInput, MatchStrategy, SlotMatcher};
pub use normalizer::{normalize, normalize_time_slot, NormalizedKey};
pub use reconciler::{reconcile, reconcile_schedule, reconcile_with, schedule_to_raw, to_raw_tokens};
pub use schedule::{SavedSchedule, ScheduleService};
pub use session::{ScheduleEditSession, SessionState};
pub use slots::{canonical_slots, CANONICAL_SLOTS};
pub use store::{InMemoryScheduleStore, ScheduleStore};
pub use toggle::{toggle, toggle_with, ToggleOutcome};
