use crate::models::{NicheAnalysis, NicheResult, Report};
use crate::services::niche_analyzer::NicheAnalyzer;
use crate::services::youtube_api::VideoProvider;
use crate::utils::round2;
use log::{info, warn};

pub struct ReportAggregator<P> {
    analyzer: NicheAnalyzer<P>,
}

impl<P: VideoProvider> ReportAggregator<P> {
    pub fn new(analyzer: NicheAnalyzer<P>) -> Self {
        ReportAggregator { analyzer }
    }

    /// Analyzes every niche in order. Niches without data are left out of the
    /// report and of the average.
    pub async fn aggregate<S: AsRef<str>>(&self, niches: &[S]) -> Report {
        let mut report = Report::default();

        for (index, niche) in niches.iter().enumerate() {
            let niche = niche.as_ref();
            info!("Niche {}/{}: {niche}", index + 1, niches.len());

            match self.analyzer.analyze(niche).await {
                NicheAnalysis::Analyzed(result) => report.niches.push((niche.to_string(), result)),
                NicheAnalysis::NoData | NicheAnalysis::Failed(_) => {
                    info!("Niche '{niche}' excluded from the report");
                }
            }
        }

        report.average_coefficient = average_coefficient(report.niches.iter().map(|(_, r)| r));
        info!(
            "Analyzed {} of {} niches, average coefficient {}",
            report.len(),
            niches.len(),
            report.average_coefficient
        );
        report
    }
}

/// Mean of the finite coefficients, rounded to two decimals; 0 when there are none.
///
/// A niche with shorts but no long-form videos has an infinite coefficient and
/// does not take part, otherwise a single such niche would turn the average infinite.
pub fn average_coefficient<'a, I>(results: I) -> f64
where
    I: IntoIterator<Item = &'a NicheResult>,
{
    let mut total = 0.0;
    let mut count = 0usize;
    let mut excluded = 0usize;

    for result in results {
        if result.coefficient.is_finite() {
            total += result.coefficient;
            count += 1;
        } else {
            excluded += 1;
        }
    }

    if excluded > 0 {
        warn!("{excluded} niche(s) with an infinite coefficient left out of the average");
    }

    if count == 0 {
        0.0
    } else {
        round2(total / count as f64)
    }
}
