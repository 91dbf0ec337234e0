//! End-to-end tests against the in-memory object store and backend.

mod helpers;

mod access_test;
mod admin_test;
mod auth_test;
mod bucket_test;
mod object_test;
mod quota_test;
mod route_test;
mod search_test;
mod share_test;
