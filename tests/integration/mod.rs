//! End-to-end tests that drive the compiled `buildkeeper` binary

mod helpers;

mod test_finalize;
mod test_init;
mod test_negotiate;
mod test_record;
mod test_stage;
