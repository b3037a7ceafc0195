// Copyright 2021 Juan A. Cáceres (cacexp@gmail.com)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The three-state outcome monad: `Value`, `Error`, `Exception`.
//!
//! This merges the result-type idiom with tolerance for panics raised
//! inside user-supplied continuations: such panics are caught at the
//! pipeline boundary and surfaced as the `Exception` arm instead of
//! unwinding past the caller.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// An opaque, captured panic payload. Stringified on a best-effort
/// basis via `error_message`-style callers; see `Outcome::exception_message`.
pub struct CapturedException(Box<dyn Any + Send + 'static>);

impl CapturedException {
    fn new(payload: Box<dyn Any + Send + 'static>) -> Self {
        CapturedException(payload)
    }

    /// Renders the captured payload as text when it is a `&str` or
    /// `String` (the two payload shapes `std::panic!` produces),
    /// otherwise `None`.
    pub fn message(&self) -> Option<&str> {
        if let Some(s) = self.0.downcast_ref::<&str>() {
            Some(s)
        } else if let Some(s) = self.0.downcast_ref::<String>() {
            Some(s.as_str())
        } else {
            None
        }
    }
}

impl fmt::Debug for CapturedException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(m) => write!(f, "CapturedException({:?})", m),
            None => write!(f, "CapturedException(<opaque>)"),
        }
    }
}

/// The three-state outcome: exactly one of `Value`, `Error`, `Exception`
/// is active at a time.
pub enum Outcome<T, E> {
    Value(T),
    Error(E),
    Exception(CapturedException),
}

impl<T, E> Outcome<T, E> {
    pub fn value(v: T) -> Self {
        Outcome::Value(v)
    }

    pub fn error(e: E) -> Self {
        Outcome::Error(e)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    pub fn is_exception(&self) -> bool {
        matches!(self, Outcome::Exception(_))
    }

    /// Invokes `f` on the owned value when in the `Value` state; a
    /// panic inside `f` transitions the outcome to `Exception` instead
    /// of propagating. Other states pass through unchanged.
    pub fn then<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E>
    where
        T: 'static,
        U: 'static,
    {
        match self {
            Outcome::Value(v) => match panic::catch_unwind(AssertUnwindSafe(|| f(v))) {
                Ok(u) => Outcome::Value(u),
                Err(payload) => Outcome::Exception(CapturedException::new(payload)),
            },
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Exception(ex) => Outcome::Exception(ex),
        }
    }

    /// Observer variant of `then`: invokes `f` on a borrow of the value,
    /// leaving the outcome's `Value` in place. This is the form the
    /// source reserves for void continuations that are also callable
    /// against an immutable borrow — a plain `then` with a void return
    /// always collapses to `Value(())` (see `then_void`).
    pub fn then_observe(self, f: impl FnOnce(&T)) -> Outcome<T, E>
    where
        T: 'static,
    {
        match self {
            Outcome::Value(v) => match panic::catch_unwind(AssertUnwindSafe(|| f(&v))) {
                Ok(()) => Outcome::Value(v),
                Err(payload) => Outcome::Exception(CapturedException::new(payload)),
            },
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Exception(ex) => Outcome::Exception(ex),
        }
    }

    /// `then` with a void-returning, value-consuming continuation: the
    /// outcome becomes `Value(())` rather than retaining `T` (unlike
    /// `then_observe`, which never consumes `T`).
    pub fn then_void(self, f: impl FnOnce(T)) -> Outcome<(), E>
    where
        T: 'static,
    {
        match self {
            Outcome::Value(v) => match panic::catch_unwind(AssertUnwindSafe(|| f(v))) {
                Ok(()) => Outcome::Value(()),
                Err(payload) => Outcome::Exception(CapturedException::new(payload)),
            },
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Exception(ex) => Outcome::Exception(ex),
        }
    }

    /// Applies `g` only in the `Error` state, recovering into `Value`;
    /// passthrough otherwise. A panic inside `g` transitions to
    /// `Exception`.
    pub fn catch_error(self, g: impl FnOnce(E) -> T) -> Outcome<T, E>
    where
        E: 'static,
    {
        match self {
            Outcome::Value(v) => Outcome::Value(v),
            Outcome::Error(e) => match panic::catch_unwind(AssertUnwindSafe(|| g(e))) {
                Ok(u) => Outcome::Value(u),
                Err(payload) => Outcome::Exception(CapturedException::new(payload)),
            },
            Outcome::Exception(ex) => Outcome::Exception(ex),
        }
    }

    /// Applies `h` only in the `Exception` state as an observer: the
    /// state is preserved unless `h` itself panics, in which case the
    /// outcome re-enters `Exception` with the new payload.
    pub fn catch_exception(self, h: impl FnOnce(&CapturedException)) -> Outcome<T, E> {
        match self {
            Outcome::Exception(ex) => match panic::catch_unwind(AssertUnwindSafe(|| h(&ex))) {
                Ok(()) => Outcome::Exception(ex),
                Err(payload) => Outcome::Exception(CapturedException::new(payload)),
            },
            other => other,
        }
    }

    /// Exhaustive sink with all three arms, returning the common type `R`.
    pub fn match3<R>(
        self,
        on_value: impl FnOnce(T) -> R,
        on_error: impl FnOnce(E) -> R,
        on_exception: impl FnOnce(CapturedException) -> R,
    ) -> R {
        match self {
            Outcome::Value(v) => on_value(v),
            Outcome::Error(e) => on_error(e),
            Outcome::Exception(ex) => on_exception(ex),
        }
    }

    /// Two-arm sink (no exception arm): returns `None` when the outcome
    /// is `Exception`, otherwise `Some` of the common return type.
    pub fn match2<R>(
        self,
        on_value: impl FnOnce(T) -> R,
        on_error: impl FnOnce(E) -> R,
    ) -> Option<R> {
        match self {
            Outcome::Value(v) => Some(on_value(v)),
            Outcome::Error(e) => Some(on_error(e)),
            Outcome::Exception(_) => None,
        }
    }

    /// `match` with a default, used for arm subsets narrower than three.
    pub fn match_or(
        self,
        on_value: impl FnOnce(T) -> T,
        on_error: impl FnOnce(E) -> T,
        default: impl FnOnce(CapturedException) -> T,
    ) -> T {
        match self {
            Outcome::Value(v) => on_value(v),
            Outcome::Error(e) => on_error(e),
            Outcome::Exception(ex) => default(ex),
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_error(self) -> Option<E> {
        match self {
            Outcome::Error(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn then_identity_preserves_value() {
        let o: Outcome<i32, &str> = Outcome::value(5);
        let o = o.then(|x| x);
        assert!(matches!(o, Outcome::Value(5)));
    }

    #[test]
    fn then_panic_becomes_exception() {
        let o: Outcome<i32, &str> = Outcome::value(1);
        let o = o.then(|_x| -> i32 {
            panic!("boom");
        });
        assert!(o.is_exception());

        // A subsequent then does not invoke g.
        let mut invoked = false;
        let o2 = o.then(|_: i32| {
            invoked = true;
        });
        assert!(!invoked);
        assert!(o2.is_exception());
    }

    #[test]
    fn catch_exception_invoked_exactly_once() {
        let o: Outcome<i32, &str> = Outcome::value(1);
        let o = o.then(|_| -> i32 { panic!("boom") });

        let mut calls = 0;
        let mut seen = String::new();
        let o = o.catch_exception(|ex| {
            calls += 1;
            if let Some(m) = ex.message() {
                seen.push_str(m);
            }
        });
        assert_eq!(calls, 1);
        assert_eq!(seen, "boom");
        assert!(o.is_exception());
    }

    #[test]
    fn catch_error_only_applies_to_error_arm() {
        let o: Outcome<i32, &str> = Outcome::error("nope");
        let o = o.catch_error(|_e| -1);
        match o {
            Outcome::Value(v) => assert_eq!(v, -1),
            _ => panic!("expected value"),
        }

        let o2: Outcome<i32, &str> = Outcome::value(7);
        let mut called = false;
        let o2 = o2.catch_error(|_| {
            called = true;
            -1
        });
        assert!(!called);
        assert!(matches!(o2, Outcome::Value(7)));
    }

    #[test]
    fn match3_exhaustive() {
        let o: Outcome<i32, &str> = Outcome::value(3);
        let r = o.match3(|v| v * 2, |_| -1, |_| -2);
        assert_eq!(r, 6);
    }
}
