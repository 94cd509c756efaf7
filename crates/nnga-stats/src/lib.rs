//! Statistical helpers for the nnga workspace.
//!
//! The genetic algorithm needs a handful of summary statistics over fitness scores
//! and gene values:
//!
//! - **Proportionate selection** shifts every score by `mean - scale * sample_std_dev`
//!   before turning scores into probabilities.
//! - **Progress reporting** prints min/max/mean fitness per generation and the spread
//!   of each gene across the population.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ```
//! use nnga_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.count, 5);
//! ```

pub mod descriptive;
