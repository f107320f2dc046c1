// 对比图 - 分组柱状图渲染

use crate::models::{ComparisonReport, Sentiment};
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 700;
/// 每组柱子占一个类别刻度的宽度比例
const GROUP_WIDTH: f64 = 0.8;

/// 渲染情感分布对比图（PNG）
///
/// 横轴为三个情感类别（固定顺序：正面、中性、负面），每个类别
/// 下按视频并排画柱，柱顶标注百分比，图例标明视频标题。
pub fn render_comparison_chart(report: &ComparisonReport, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("无法初始化图表画布: {}", path.display()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Comparación de Sentimiento de Audiencias en YouTube (Múltiples Videos)",
            ("sans-serif", 28),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..2.5f64, 0f64..100f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(3)
        .x_label_formatter(&|x| {
            let idx = x.round();
            if (x - idx).abs() < 1e-6 && (0.0..=2.0).contains(&idx) {
                Sentiment::DISPLAY_ORDER[idx as usize]
                    .display_name()
                    .to_string()
            } else {
                String::new()
            }
        })
        .x_desc("Categoría de Sentimiento")
        .y_desc("Porcentaje (%)")
        .label_style(("sans-serif", 16))
        .draw()?;

    let bar_width = GROUP_WIDTH / report.videos.len() as f64;
    let label_font = ("sans-serif", 13).into_font();

    for (series, video) in report.videos.iter().enumerate() {
        let color = series_color(series);

        chart
            .draw_series(Sentiment::DISPLAY_ORDER.iter().enumerate().map(
                |(category, label)| {
                    let pct = video.distribution.pct(*label);
                    let x0 = category as f64 - GROUP_WIDTH / 2.0 + series as f64 * bar_width;
                    let x1 = x0 + bar_width * 0.92;
                    Rectangle::new([(x0, 0.0), (x1, pct)], color.filled())
                },
            ))?
            .label(video.title.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));

        // 柱顶百分比标注
        chart.draw_series(Sentiment::DISPLAY_ORDER.iter().enumerate().map(
            |(category, label)| {
                let pct = video.distribution.pct(*label);
                let x = category as f64 - GROUP_WIDTH / 2.0
                    + series as f64 * bar_width
                    + bar_width * 0.2;
                Text::new(format!("{:.1}%", pct), (x, pct + 1.5), label_font.clone())
            },
        ))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font(("sans-serif", 16))
        .draw()?;

    root.present()
        .with_context(|| format!("无法写入图表文件: {}", path.display()))?;
    Ok(())
}

/// 视频系列的颜色：循环使用三个情感标签色（绿、黄、红）
fn series_color(series: usize) -> RGBColor {
    let order = Sentiment::DISPLAY_ORDER;
    let hex = order[series % order.len()].color();
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).unwrap_or_default()
    };
    RGBColor(channel(1..3), channel(3..5), channel(5..7))
}
