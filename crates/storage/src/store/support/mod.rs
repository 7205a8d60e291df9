#![forbid(unsafe_code)]

mod json;
mod schema;
mod time;

pub(super) use json::{decode_string_list, encode_string_list};
pub(super) use schema::{install_schema, preflight_gate};
pub(super) use time::now_ms;
