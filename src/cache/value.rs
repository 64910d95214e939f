//! Cache Value Module
//!
//! Marks which payloads count as "no value" and must be refused by `set`.

/// A payload the cache can hold.
///
/// `is_absent` returns true for the type's designated empty marker.
/// Most types have none and keep the default.
pub trait CacheValue: Clone + Send + 'static {
    fn is_absent(&self) -> bool {
        false
    }
}

impl CacheValue for String {}

impl CacheValue for serde_json::Value {
    fn is_absent(&self) -> bool {
        self.is_null()
    }
}

impl<T: Clone + Send + 'static> CacheValue for Option<T> {
    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

macro_rules! impl_present_value {
    ($($ty:ty),*) => {
        $(impl CacheValue for $ty {})*
    };
}

impl_present_value!(i32, i64, u32, u64, usize, bool);
