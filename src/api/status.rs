//! Retry eligibility of HTTP status codes
//!
//! Successful statuses and client errors are final: retrying cannot change
//! the outcome. Anything else may be retried by the invoker.

/// Status codes the invoker must never retry: 200, 201, 202, 204 and 400-499
pub const NO_RETRY_STATUS_CODES: [u16; 104] = no_retry_status_codes();

const fn no_retry_status_codes() -> [u16; 104] {
    let mut codes = [0u16; 104];
    codes[0] = 200;
    codes[1] = 201;
    codes[2] = 202;
    codes[3] = 204;

    let mut i = 0;
    while i < 100 {
        codes[4 + i] = 400 + i as u16;
        i += 1;
    }
    codes
}

/// Whether a response with this status may be retried
pub fn is_retry_eligible(status: u16) -> bool {
    !NO_RETRY_STATUS_CODES.contains(&status)
}
