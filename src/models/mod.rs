pub mod booking;
pub mod layout;
pub mod member;
pub mod seat;
pub mod session;

pub use booking::{Booking, BookingRecord, BookingRow, NewBooking};
pub use layout::{RowId, SeatLayoutDefinition, SeatRecord};
pub use member::Member;
pub use seat::{Seat, SeatStatus, SeatType};
pub use session::StudioSession;
