pub use self::{block_type::*, board::*, piece::*, render_board::*};

pub(crate) mod block_type;
pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod render_board;
