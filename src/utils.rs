pub(crate) trait IsZST {
    const IS_ZST: bool;
}

impl<T> IsZST for T {
    const IS_ZST: bool = core::mem::size_of::<T>() == 0;
}

#[cold]
#[inline(always)]
pub(crate) const fn cold_path() {}

#[cold]
#[inline(never)]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

/// Capacity of the heap region allocated for `required` live elements: `floor(1.5 * required)`.
///
/// Never less than `required`. Saturates instead of overflowing; the allocation
/// then fails with a capacity overflow instead of wrapping around.
#[inline(always)]
pub(crate) const fn grown_capacity(required: usize) -> usize {
    let capacity = required.saturating_add(required / 2);
    if capacity < required { required } else { capacity }
}

/// Normalise a range into `(start, end)` for a sequence of `len` elements.
///
/// The result is not validated; callers assert `start <= end <= len`.
#[inline(always)]
pub(crate) fn split_range_bound(
    src: &impl core::ops::RangeBounds<usize>,
    len: usize,
) -> (usize, usize) {
    let start = match src.start_bound() {
        core::ops::Bound::Included(&i) => i,
        core::ops::Bound::Excluded(&i) => i.checked_add(1).unwrap_or_else(|| capacity_overflow()),
        core::ops::Bound::Unbounded => 0,
    };

    let end = match src.end_bound() {
        core::ops::Bound::Included(&i) => i.checked_add(1).unwrap_or_else(|| capacity_overflow()),
        core::ops::Bound::Excluded(&i) => i,
        core::ops::Bound::Unbounded => len,
    };
    (start, end)
}

/// Emit a `trace` event for a storage transition when the `tracing` feature is enabled.
macro_rules! trace_transition {
    ($from:literal => $to:literal, $len:expr, $cap:expr) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "vlvec",
            from = $from,
            to = $to,
            len = $len,
            capacity = $cap,
            "storage transition"
        );
    };
}

pub(crate) use trace_transition;

#[cfg(test)]
mod tests {
    use super::{grown_capacity, split_range_bound};

    #[test]
    fn growth_is_floor_of_one_and_a_half() {
        assert_eq!(grown_capacity(0), 0);
        assert_eq!(grown_capacity(1), 1);
        assert_eq!(grown_capacity(2), 3);
        assert_eq!(grown_capacity(5), 7);
        assert_eq!(grown_capacity(17), 25);
        for required in 0..1000 {
            assert!(grown_capacity(required) >= required);
        }
    }

    #[test]
    fn growth_saturates() {
        assert_eq!(grown_capacity(usize::MAX), usize::MAX);
        assert!(grown_capacity(usize::MAX / 2 + 7) >= usize::MAX / 2 + 7);
    }

    #[test]
    fn range_bounds() {
        assert_eq!(split_range_bound(&(..), 5), (0, 5));
        assert_eq!(split_range_bound(&(1..3), 5), (1, 3));
        assert_eq!(split_range_bound(&(1..=3), 5), (1, 4));
        assert_eq!(split_range_bound(&(2..), 5), (2, 5));
    }

    #[cfg(feature = "tracing")]
    mod transitions {
        extern crate std;

        use crate::{VlVec, vlvec};
        use std::{
            string::String,
            sync::{Arc, Mutex},
            vec::Vec,
        };
        use tracing::field::{Field, Visit};
        use tracing_subscriber::{Layer, layer::Context, prelude::*};

        #[derive(Debug, Default, PartialEq, Eq)]
        struct Transition {
            from: String,
            to: String,
            len: u64,
            capacity: u64,
        }

        impl Visit for Transition {
            fn record_str(&mut self, field: &Field, value: &str) {
                match field.name() {
                    "from" => self.from = value.into(),
                    "to" => self.to = value.into(),
                    _ => {}
                }
            }

            fn record_u64(&mut self, field: &Field, value: u64) {
                match field.name() {
                    "len" => self.len = value,
                    "capacity" => self.capacity = value,
                    _ => {}
                }
            }

            fn record_debug(&mut self, _: &Field, _: &dyn core::fmt::Debug) {}
        }

        #[derive(Clone, Default)]
        struct Recorder(Arc<Mutex<Vec<Transition>>>);

        impl<S: tracing::Subscriber> Layer<S> for Recorder {
            fn on_event(&self, event: &tracing::Event<'_>, _: Context<'_, S>) {
                if event.metadata().target() != "vlvec" {
                    return;
                }
                let mut transition = Transition::default();
                event.record(&mut transition);
                self.0.lock().unwrap().push(transition);
            }
        }

        fn t(from: &str, to: &str, len: u64, capacity: u64) -> Transition {
            Transition {
                from: from.into(),
                to: to.into(),
                len,
                capacity,
            }
        }

        #[test]
        fn every_transition_is_traced() {
            let recorder = Recorder::default();
            let subscriber = tracing_subscriber::registry().with(recorder.clone());

            tracing::subscriber::with_default(subscriber, || {
                let mut v: VlVec<i32, 2> = vlvec![1, 2];
                v.push(3);
                v.push(4);
                v.push(5);
                v.pop();
                v.pop();
                v.pop();
                v.extend([6, 7, 8]);
                v.clear();
            });

            let events = recorder.0.lock().unwrap();
            assert_eq!(
                *events,
                [
                    t("inline", "heap", 2, 4),
                    t("heap", "heap", 4, 7),
                    t("heap", "inline", 2, 2),
                    t("inline", "heap", 2, 7),
                    t("heap", "inline", 0, 2),
                ]
            );
        }

        #[test]
        fn inline_only_work_is_silent() {
            let recorder = Recorder::default();
            let subscriber = tracing_subscriber::registry().with(recorder.clone());

            tracing::subscriber::with_default(subscriber, || {
                let mut v: VlVec<i32, 4> = VlVec::new();
                v.extend([1, 2, 3, 4]);
                v.erase(0);
                v.clear();
            });

            assert!(recorder.0.lock().unwrap().is_empty());
        }
    }
}
