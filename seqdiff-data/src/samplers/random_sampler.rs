// seqdiff-data/src/samplers/random_sampler.rs

use super::traits::Sampler;
use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Visits samples in random order.
///
/// Without replacement every index appears at most once; a request for more
/// samples than the dataset holds is clamped to the dataset length. With
/// replacement indices are drawn independently and uniformly.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    replacement: bool,
    num_samples: Option<usize>,
    seed: Option<u64>,
}

impl RandomSampler {
    /// `num_samples` defaults to the dataset length when `None`.
    pub fn new(replacement: bool, num_samples: Option<usize>) -> Self {
        RandomSampler {
            replacement,
            num_samples,
            seed: None,
        }
    }

    /// Draws from a generator seeded with `seed`, so every epoch produced by
    /// this sampler repeats the same order.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Sampler for RandomSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        if dataset_len == 0 {
            return Box::new(std::iter::empty());
        }
        let count = self.len(dataset_len);
        let mut rng = self.rng();

        if self.replacement {
            let indices: Vec<usize> = (0..count).map(|_| rng.gen_range(0..dataset_len)).collect();
            return Box::new(indices.into_iter());
        }

        let mut indices: Vec<usize> = (0..dataset_len).collect();
        indices.shuffle(&mut rng);
        indices.truncate(count);
        Box::new(indices.into_iter())
    }

    fn len(&self, dataset_len: usize) -> usize {
        let requested = self.num_samples.unwrap_or(dataset_len);
        if !self.replacement && requested > dataset_len {
            warn!(
                "RandomSampler: {} samples requested without replacement from {} items, using {}",
                requested, dataset_len, dataset_len
            );
            return dataset_len;
        }
        requested
    }
}

#[cfg(test)]
#[path = "random_sampler_test.rs"]
mod tests;
