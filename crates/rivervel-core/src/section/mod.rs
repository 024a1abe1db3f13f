pub mod aggregate;
pub mod profile;
pub mod sampler;

pub use aggregate::{aggregate, partition_sizes, SectionAggregate, SectionSummary};
pub use profile::{CrossSectionProfile, ProfileSample, SampleSource};
pub use sampler::{sample_cross_section, CrossSectionSampler, SamplerConfig, UnresolvedPolicy};
