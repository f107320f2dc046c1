// 报告模块 - 跨视频对比、文本摘要与图表输出

pub mod chart;

use crate::analysis::{sample_examples, AnalysisPipeline};
use crate::models::{ComparisonReport, Sentiment, VideoReport, VideoTarget};
use anyhow::Result;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{info, warn};

/// 示例评论抽样的固定种子（保证报告可复现）
const EXAMPLE_SEED: u64 = 42;
/// 每个标签最多展示的示例评论数
const EXAMPLE_COUNT: usize = 10;

/// 对比报告生成器
///
/// 按给定顺序逐个运行视频分析流水线；单个视频失败只会被
/// 记录并跳过，不会中断其余视频。
pub struct ComparativeReporter {
    pipeline: AnalysisPipeline,
    chart_path: PathBuf,
}

impl ComparativeReporter {
    pub fn new(pipeline: AnalysisPipeline, chart_path: PathBuf) -> Self {
        Self {
            pipeline,
            chart_path,
        }
    }

    /// 运行全部视频的分析并汇总成对比报告
    pub async fn compare(
        &self,
        targets: &[VideoTarget],
        use_live_source: bool,
    ) -> ComparisonReport {
        let mut report = ComparisonReport::default();

        for target in targets {
            match self.pipeline.analyze(target, use_live_source).await {
                Ok(analysis) => {
                    let video = VideoReport {
                        title: target.title.clone(),
                        distribution: analysis.distribution,
                        total_comments: analysis.comments.len(),
                        positive_examples: sample_examples(
                            &analysis.comments,
                            Sentiment::Positive,
                            EXAMPLE_COUNT,
                            EXAMPLE_SEED,
                        ),
                        negative_examples: sample_examples(
                            &analysis.comments,
                            Sentiment::Negative,
                            EXAMPLE_COUNT,
                            EXAMPLE_SEED,
                        ),
                    };
                    report.videos.push(video);
                }
                Err(e) => {
                    warn!("跳过视频 {}: {}", target.title, e);
                }
            }
        }

        report
    }

    /// 渲染对比图
    ///
    /// 少于两个成功结果时不出图（记录提示后正常返回false）。
    pub fn render_chart(&self, report: &ComparisonReport) -> Result<bool> {
        if report.videos.len() < 2 {
            info!("成功分析的视频不足两个，跳过对比图生成");
            return Ok(false);
        }

        info!("--- 生成对比图: {} ---", self.chart_path.display());
        chart::render_comparison_chart(report, &self.chart_path)?;
        info!("对比图已生成: {}", self.chart_path.display());
        Ok(true)
    }
}

/// 生成控制台文本摘要
pub fn render_text(report: &ComparisonReport) -> String {
    let mut out = String::new();

    if report.videos.is_empty() {
        out.push_str("No hay resultados para mostrar.\n");
        return out;
    }

    for video in &report.videos {
        let d = &video.distribution;
        let _ = writeln!(out, "\n--- RESUMEN DEL SENTIMIENTO EN YOUTUBE ---");
        let _ = writeln!(out, "Video: {}", video.title);
        let _ = writeln!(
            out,
            "Total de comentarios analizados: {}",
            video.total_comments
        );
        let _ = writeln!(out, "\nDistribución Porcentual:");
        let _ = writeln!(out, "  🟢 Positivos: {:.1}%", d.positive_pct);
        let _ = writeln!(out, "  🟡 Neutros:   {:.1}%", d.neutral_pct);
        let _ = writeln!(out, "  🔴 Negativos: {:.1}%", d.negative_pct);

        if d.positive_pct > d.negative_pct {
            let _ = writeln!(
                out,
                "\nConclusión: El video está generando una respuesta mayormente positiva."
            );
        } else {
            let _ = writeln!(
                out,
                "\nConclusión: La reacción es mixta o inclinada hacia la negatividad/neutralidad."
            );
        }

        if !video.positive_examples.is_empty() {
            let _ = writeln!(
                out,
                "\n⭐⭐ TOP 10 COMENTARIOS POSITIVOS (Ejemplos Aleatorios) ⭐⭐"
            );
            for comment in &video.positive_examples {
                let _ = writeln!(out, "  - {}: {}", comment.author, comment.raw_text);
            }
        }
        if !video.negative_examples.is_empty() {
            let _ = writeln!(
                out,
                "\n🔴 TOP 10 COMENTARIOS NEGATIVOS (Ejemplos Aleatorios) 🔴"
            );
            for comment in &video.negative_examples {
                let _ = writeln!(out, "  - {}: {}", comment.author, comment.raw_text);
            }
        }
    }

    if report.videos.len() < 2 {
        let _ = writeln!(
            out,
            "\n🛑 No hay suficientes datos para generar el gráfico comparativo."
        );
    }

    out
}
