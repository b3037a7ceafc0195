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

//! The byte-sequence customisation point: the single adapter
//! between user-supplied body values and the wire, in both directions.

use std::borrow::Cow;

/// Marker for scalar types whose in-memory representation is exactly
/// their byte sequence — no padding, no indirection. Implemented only
/// for the primitive numeric types and `bool`; aggregates reach the
/// wire through a manual `AsByteSeq`/`LoadByteSeq` impl instead (the
/// "user-defined hook" case), never through this marker.
///
/// # Safety
/// Implementors must have a byte representation with no padding bytes
/// and must be safe to reconstruct from any bit pattern of the right
/// size (`FromByteSeq` relies on this).
pub unsafe trait ByteScalar: Copy + 'static {}

macro_rules! impl_byte_scalar {
    ($($t:ty),* $(,)?) => {
        $(unsafe impl ByteScalar for $t {})*
    };
}

impl_byte_scalar!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool);

/// Converts a value into its wire byte view. Priority order (highest
/// first):
/// 1. String-shaped values (`str`/`String`) — element bytes at width 1.
/// 2. Contiguous sequences of `ByteScalar` elements (`[T]`/`Vec<T>`) —
///    viewed as their byte span.
/// 3. A user's own `AsByteSeq` impl on an aggregate type (the hook).
/// 4. A `ByteScalar` itself, viewed as its own storage.
/// 5. An existing byte span (`[u8]`/`Vec<u8>`), passed through — this
///    is case 2 specialised to `T = u8` and needs no separate impl.
///
/// Rust has no overload resolution to arbitrate between cases 1–5, so
/// each case is a distinct impl of this trait on a distinct type; the
/// "priority order" above is really just "pick the impl that matches
/// your type", which is what trait resolution already does here.
pub trait AsByteSeq {
    fn as_byte_seq(&self) -> Cow<'_, [u8]>;
}

impl AsByteSeq for str {
    fn as_byte_seq(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl AsByteSeq for String {
    fn as_byte_seq(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl<T: ByteScalar> AsByteSeq for [T] {
    fn as_byte_seq(&self) -> Cow<'_, [u8]> {
        let len = std::mem::size_of_val(self);
        let ptr = self.as_ptr() as *const u8;
        // SAFETY: `T: ByteScalar` guarantees no padding and that every
        // byte of the slice's backing storage is initialised.
        Cow::Borrowed(unsafe { std::slice::from_raw_parts(ptr, len) })
    }
}

impl<T: ByteScalar> AsByteSeq for Vec<T> {
    fn as_byte_seq(&self) -> Cow<'_, [u8]> {
        self.as_slice().as_byte_seq()
    }
}

/// Blanket impl for bare scalars (case 4). Implemented per-type rather
/// than generically over `T: ByteScalar` because a generic `impl<T:
/// ByteScalar> AsByteSeq for T` would conflict with the `[T]`/`Vec<T>`
/// impls above once a user's own hook impl is added for some `T`; the
/// macro keeps the scalar and slice impls disjoint.
macro_rules! impl_scalar_as_byte_seq {
    ($($t:ty),* $(,)?) => {
        $(
            impl AsByteSeq for $t {
                fn as_byte_seq(&self) -> Cow<'_, [u8]> {
                    let ptr = self as *const $t as *const u8;
                    Cow::Borrowed(unsafe { std::slice::from_raw_parts(ptr, std::mem::size_of::<$t>()) })
                }
            }
        )*
    };
}

impl_scalar_as_byte_seq!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool);

/// The inverse of `AsByteSeq`: reconstructs a value of `Self` from a
/// byte view, for response-body deserialisation. Mirrors `AsByteSeq`'s
/// four non-passthrough cases (a raw byte span needs no reconstruction
/// — the caller already has what `load_byte_seq` would produce).
pub trait LoadByteSeq: Sized {
    fn load_byte_seq(bytes: &[u8]) -> Option<Self>;
}

impl<T: ByteScalar> LoadByteSeq for T {
    fn load_byte_seq(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != std::mem::size_of::<T>() {
            return None;
        }
        // SAFETY: length checked above; `ByteScalar` guarantees any bit
        // pattern of the right size is a valid `T`.
        Some(unsafe { std::ptr::read_unaligned(bytes.as_ptr() as *const T) })
    }
}

impl<T: ByteScalar> LoadByteSeq for Vec<T> {
    fn load_byte_seq(bytes: &[u8]) -> Option<Self> {
        let elem = std::mem::size_of::<T>();
        if elem == 0 || bytes.len() % elem != 0 {
            return None;
        }
        let count = bytes.len() / elem;
        let mut out = Vec::with_capacity(count);
        for chunk in bytes.chunks_exact(elem) {
            // SAFETY: chunk length is exactly `size_of::<T>()`.
            out.push(unsafe { std::ptr::read_unaligned(chunk.as_ptr() as *const T) });
        }
        Some(out)
    }
}

impl LoadByteSeq for String {
    fn load_byte_seq(bytes: &[u8]) -> Option<Self> {
        String::from_utf8(bytes.to_vec()).ok()
    }
}

/// Default `Content-Type` for a body type: `text/plain` for
/// string-shaped bodies, `application/octet-stream` otherwise. Types
/// that want a different default implement this directly instead of
/// relying on the blanket fallback.
pub trait QueryContentType {
    fn query_content_type() -> &'static str {
        "application/octet-stream"
    }
}

impl QueryContentType for str {
    fn query_content_type() -> &'static str {
        "text/plain"
    }
}

impl QueryContentType for String {
    fn query_content_type() -> &'static str {
        "text/plain"
    }
}

impl<T: ByteScalar> QueryContentType for T {}
impl<T: ByteScalar> QueryContentType for [T] {}
impl<T: ByteScalar> QueryContentType for Vec<T> {}
