//! Output scheduling for the terminal.

mod print_queue;

pub use print_queue::{
    MemorySink, OutputSink, PrintQueue, PrintTicket, DEFAULT_TYPE_DELAY,
};
