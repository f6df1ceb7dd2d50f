//! HTTP-level integration tests, driven through the full router over the
//! in-memory store.

mod helpers;

mod account_test;
mod oauth_test;
mod share_test;
mod video_test;
