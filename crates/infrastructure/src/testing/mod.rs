//! Response checking.
//!
//! Ready-made checkers for status codes, JSON shape, headers and body text.

mod checkers;

pub use checkers::{
    expect_body_contains, expect_body_matches, expect_content_type, expect_decoded,
    expect_header, expect_json_branch, expect_json_fields, expect_list_length,
    expect_list_non_empty, expect_status,
};
