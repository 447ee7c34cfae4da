use crate::VlVec;
use core::marker::PhantomData;
use serde_core::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{SeqAccess, Visitor},
    ser::SerializeSeq,
};

/// Upper bound on the bytes preallocated from an untrusted sequence length.
const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

/// Number of elements to reserve for a sequence that claims `hint` elements.
///
/// The hint comes from the input, so it is capped; the rest grows as elements arrive.
fn cautious_hint<T>(hint: Option<usize>) -> usize {
    let size = core::mem::size_of::<T>();
    if size == 0 {
        return 0;
    }
    core::cmp::min(hint.unwrap_or(0), MAX_PREALLOC_BYTES / size)
}

impl<T: Serialize, const N: usize> Serialize for VlVec<T, N> {
    /// Serialize a `VlVec` as a sequence.
    ///
    /// The serialization format is identical whether the data is inline or on the heap.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>, const N: usize> Deserialize<'de> for VlVec<T, N> {
    /// Deserialize a `VlVec` from a sequence.
    ///
    /// If the sequence is longer than `N`, the data will be stored on the heap.
    /// A length announced by the input is trusted only up to 1 MiB of preallocation.
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VlVecVisitor<T, const N: usize> {
            _marker: PhantomData<T>,
        }

        impl<'de, T: Deserialize<'de>, const N: usize> Visitor<'de> for VlVecVisitor<T, N> {
            type Value = VlVec<T, N>;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a sequence")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut vec = VlVec::new();
                vec.reserve(cautious_hint::<T>(seq.size_hint()));

                while let Some(element) = seq.next_element()? {
                    vec.push(element);
                }

                Ok(vec)
            }
        }

        deserializer.deserialize_seq(VlVecVisitor {
            _marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_PREALLOC_BYTES, cautious_hint};
    use crate::{VlVec, vlvec};
    use alloc::string::String;
    use serde_core::de::{Deserialize, Deserializer, SeqAccess, Visitor, value::Error as ValueError};

    /// A sequence that announces far more elements than it yields.
    struct Inflated {
        claimed: usize,
        left: u32,
    }

    impl<'de> SeqAccess<'de> for Inflated {
        type Error = ValueError;

        fn next_element_seed<S>(&mut self, seed: S) -> Result<Option<S::Value>, Self::Error>
        where
            S: serde_core::de::DeserializeSeed<'de>,
        {
            if self.left == 0 {
                return Ok(None);
            }
            self.left -= 1;
            seed.deserialize(serde_core::de::value::U32Deserializer::new(self.left))
                .map(Some)
        }

        fn size_hint(&self) -> Option<usize> {
            Some(self.claimed)
        }
    }

    impl<'de> Deserializer<'de> for Inflated {
        type Error = ValueError;

        fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
            visitor.visit_seq(self)
        }

        serde_core::forward_to_deserialize_any! {
            bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
            bytes byte_buf option unit unit_struct newtype_struct seq tuple
            tuple_struct map struct enum identifier ignored_any
        }
    }

    #[test]
    fn cautious_hint_caps_preallocation() {
        assert_eq!(cautious_hint::<u64>(None), 0);
        assert_eq!(cautious_hint::<u64>(Some(3)), 3);
        assert_eq!(cautious_hint::<u64>(Some(usize::MAX)), MAX_PREALLOC_BYTES / 8);
        assert_eq!(cautious_hint::<()>(Some(usize::MAX)), 0);
    }

    #[test]
    fn hostile_length_does_not_abort() {
        let input = Inflated {
            claimed: usize::MAX,
            left: 3,
        };
        let r = VlVec::<u32, 2>::deserialize(input).unwrap();
        assert_eq!(r, [2, 1, 0]);
        assert!(!r.is_inline());
    }

    #[test]
    fn inline_json() {
        let v: VlVec<_, 5> = vlvec![1, 2, 3];
        let s = serde_json::to_string(&v).unwrap();
        assert_eq!(s, "[1,2,3]");
        let r: VlVec<i32, 5> = serde_json::from_str(&s).unwrap();
        assert_eq!(r, [1, 2, 3]);
        assert!(r.is_inline());
    }

    #[test]
    fn heap_json() {
        let v: VlVec<_, 2> = vlvec![1, 2, 3, 4];
        let s = serde_json::to_string(&v).unwrap();
        assert_eq!(s, "[1,2,3,4]");
        let r: VlVec<i32, 2> = serde_json::from_str(&s).unwrap();
        assert_eq!(r, [1, 2, 3, 4]);
        assert!(!r.is_inline());
    }

    #[test]
    fn threshold_does_not_change_format() {
        let v: VlVec<&str, 1> = vlvec!["a", "b"];
        let r: VlVec<String, 8> = serde_json::from_str(&serde_json::to_string(&v).unwrap()).unwrap();
        assert_eq!(r, ["a", "b"]);
    }
}
