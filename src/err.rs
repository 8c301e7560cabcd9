// Copyright 2016 Brian Smith.
//
// Permission to use, copy, modify, and/or distribute this software for any
// purpose with or without fee is hereby granted, provided that the above
// copyright notice and this permission notice appear in all copies.
//
// THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHORS DISCLAIM ALL WARRANTIES
// WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
// MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHORS BE LIABLE FOR ANY
// SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
// WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN ACTION
// OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF OR IN
// CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.

/// An error from key handling, signing or verification. The wrapped string
/// names the kind of failure and never carries secret material.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Error(&'static str);

impl Error {
    /// The kind tag, also used as the `Display` text.
    pub fn description_(&self) -> &'static str {
        self.0
    }

    pub(crate) fn rng_error() -> Self {
        Error("RngFailure")
    }

    pub(crate) fn seed_error() -> Self {
        Error("SeedOperationFailed")
    }

    pub(crate) fn sign_retries_error() -> Self {
        Error("SignRetriesExhausted")
    }

    pub(crate) fn invalid_encoding() -> Self {
        Error("InvalidEncoding")
    }

    pub(crate) fn zero_error() -> Self {
        Error("ZeroError")
    }

    pub(crate) fn invalid_private_key() -> Self {
        Error("InvalidPrivateKey")
    }

    pub(crate) fn not_on_curve_error() -> Self {
        Error("NotOnCurveError")
    }

    pub(crate) fn infinity_error() -> Self {
        Error("InfinityError")
    }

    pub(crate) fn invalid_order() -> Self {
        Error("InvalidOrder")
    }

    pub(crate) fn key_mismatch() -> Self {
        Error("KeyMismatch")
    }

    pub(crate) fn no_square_root() -> Self {
        Error("NoSquareRoot")
    }

    pub(crate) fn verify_error() -> Self {
        Error("VerifyFailed")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.description_())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_kind_tag() {
        let e = Error::sign_retries_error();
        assert_eq!(e.description_(), "SignRetriesExhausted");
        assert_eq!(e.to_string(), e.description_());
        assert_ne!(Error::zero_error(), Error::verify_error());
    }

    #[cfg(feature = "std")]
    #[test]
    fn usable_as_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(Error::rng_error());
        assert_eq!(e.to_string(), "RngFailure");
    }
}
