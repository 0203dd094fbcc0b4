#![allow(dead_code)]

pub mod datahub_env;
pub mod http_stub;
