//! HTTP request domain types

mod body;
mod call;

pub use body::{
    Body, BodyError, FORM_CONTENT_TYPE, FormBody, IntoBody, JSON_CONTENT_TYPE, JsonBody, NoopBody,
    StringBody,
};
pub use call::{Call, Headers};
