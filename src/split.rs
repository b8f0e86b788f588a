//! Seeded shuffling and the train/test split.
//!
//! Partitions are distinct types. Only [`split`] creates them, so code that
//! must see training data alone (vocabulary selection, model fitting) can ask
//! for a [`TrainSet`] and never be handed test songs.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};

/// Training partition.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSet<T>(Vec<T>);

/// Test partition.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSet<T>(Vec<T>);

macro_rules! partition_impl {
    ($name:ident) => {
        impl<T> $name<T> {
            /// Items in partition order.
            pub fn as_slice(&self) -> &[T] {
                &self.0
            }

            /// Iterate over the items.
            pub fn iter(&self) -> std::slice::Iter<'_, T> {
                self.0.iter()
            }

            /// Number of items.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// True when the partition holds nothing.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Transform every item, keeping the partition role.
            pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> $name<U> {
                $name(self.0.iter().map(f).collect())
            }

            /// Give up the partition role.
            pub fn into_inner(self) -> Vec<T> {
                self.0
            }
        }

        impl<'a, T> IntoIterator for &'a $name<T> {
            type Item = &'a T;
            type IntoIter = std::slice::Iter<'a, T>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

partition_impl!(TrainSet);
partition_impl!(TestSet);

/// Shuffle in place with a reproducible generator.
pub fn shuffle<T>(items: &mut [T], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);
}

/// Split an already shuffled corpus at `floor(train_fraction * len)`.
///
/// Fractions of exactly 0 or 1 give an empty test or train partition.
pub fn split<T>(mut corpus: Vec<T>, train_fraction: f64) -> Result<(TrainSet<T>, TestSet<T>)> {
    if !(0.0..=1.0).contains(&train_fraction) {
        return Err(Error::config(
            format!("Split fraction {train_fraction} is outside [0, 1]"),
            "Use a training percentage between 0 and 100",
        ));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let point = ((train_fraction * corpus.len() as f64).floor() as usize).min(corpus.len());
    let test = corpus.split_off(point);
    Ok((TrainSet(corpus), TestSet(test)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn seventy_percent_of_ten() {
        let (train, test) = split((0..10).collect(), 0.7).unwrap();
        assert_eq!(train.as_slice(), &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(test.as_slice(), &[7, 8, 9]);
    }

    #[test]
    fn split_point_is_floored() {
        let (train, test) = split((0..7).collect::<Vec<_>>(), 0.5).unwrap();
        assert_eq!(train.len(), 3);
        assert_eq!(test.len(), 4);
    }

    #[test]
    fn degenerate_fractions_give_empty_partitions() {
        let (train, test) = split(vec![1, 2, 3], 0.0).unwrap();
        assert!(train.is_empty());
        assert_eq!(test.len(), 3);

        let (train, test) = split(vec![1, 2, 3], 1.0).unwrap();
        assert_eq!(train.len(), 3);
        assert!(test.is_empty());
    }

    #[test]
    fn invalid_fraction_is_a_config_error() {
        let err = split(vec![1], 1.5).unwrap_err();
        assert!(err.is_fatal_config());
        assert!(split(vec![1], f64::NAN).is_err());
    }

    #[test]
    fn partitions_reconstitute_the_corpus() {
        let mut corpus: Vec<u32> = (0..23).collect();
        shuffle(&mut corpus, 7);
        let (train, test) = split(corpus.clone(), 0.3).unwrap();
        let mut joined = train.into_inner();
        joined.extend(test.into_inner());
        assert_eq!(joined, corpus);
    }

    #[test]
    fn shuffle_is_reproducible() {
        let mut a: Vec<u32> = (0..50).collect();
        let mut b = a.clone();
        shuffle(&mut a, 42);
        shuffle(&mut b, 42);
        assert_eq!(a, b);

        let mut c: Vec<u32> = (0..50).collect();
        shuffle(&mut c, 43);
        assert_ne!(a, c);
    }
}
