/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : NetEditor的describe/summary相关方法
 */

use super::NetEditor;
use crate::errors::EditorError;
use crate::net::Layer;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 网络的可序列化描述（用于调试输出、与其它工具交换）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub inputs: Vec<InputDescriptor>,
    pub layers: Vec<LayerDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDescriptor {
    pub name: String,
    pub shape: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub name: String,
    pub layer_type: String,
    pub bottom: Vec<String>,
    pub top: Vec<String>,
    /// `(lr_mult, decay_mult)`，未设置的项为None
    pub multipliers: Vec<(Option<f32>, Option<f32>)>,
    /// 启用条件，如`TRAIN`、`TEST(test-on-test)`
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub include: Vec<String>,
}

impl NetDescriptor {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&Layer> for LayerDescriptor {
    fn from(layer: &Layer) -> Self {
        Self {
            name: layer.name.clone(),
            layer_type: layer.layer_type.clone(),
            bottom: layer.bottom.clone(),
            top: layer.top.clone(),
            multipliers: layer
                .param
                .iter()
                .map(|p| (p.lr_mult, p.decay_mult))
                .collect(),
            include: layer.include.iter().map(ToString::to_string).collect(),
        }
    }
}

impl NetEditor {
    // ========== 网络描述（describe）==========

    pub fn describe(&self) -> NetDescriptor {
        let net = self.show();
        // 每个输入对应4个维度
        let inputs = net
            .input
            .iter()
            .enumerate()
            .map(|(i, name)| InputDescriptor {
                name: name.clone(),
                shape: net.input_dim.iter().skip(i * 4).take(4).copied().collect(),
            })
            .collect();

        NetDescriptor {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: net.name.clone(),
            inputs,
            layers: net.layer.iter().map(LayerDescriptor::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        self.describe()
            .to_json()
            .map_err(|e| EditorError::InvalidArgument(format!("序列化网络描述失败: {e}")))
    }

    // ========== 网络摘要（summary）==========

    /// 打印网络摘要
    ///
    /// ```ignore
    /// editor.summary();
    /// // ┌───────┬─────────────┬────────┬───────┬──────────────┐
    /// // │ 层名称 │ 类型        │ 输入   │ 输出  │ 乘子         │
    /// // ├───────┼─────────────┼────────┼───────┼──────────────┤
    /// // │ conv1 │ Convolution │ data   │ conv1 │ (0,0) (0,0)  │
    /// // ...
    /// ```
    pub fn summary(&self) {
        println!("{}", self.summary_string());
    }

    /// 保存摘要：`.md`输出Markdown表格，其它扩展名输出文本表格
    pub fn save_summary<P: AsRef<Path>>(&self, path: P) -> Result<(), EditorError> {
        let path = path.as_ref();
        let summary = match path.extension().and_then(|e| e.to_str()) {
            Some("md") => self.summary_markdown(),
            _ => self.summary_string(),
        };
        std::fs::write(path, summary)?;
        Ok(())
    }

    pub fn summary_markdown(&self) -> String {
        let desc = self.describe();
        let mut output = String::new();

        output.push_str(&format!("# 网络摘要: {}\n\n", desc.name));
        output.push_str("| 层名称 | 类型 | 输入 | 输出 | 乘子 |\n");
        output.push_str("|--------|------|------|------|------|\n");
        for layer in &desc.layers {
            let row = Self::row(layer);
            output.push_str(&format!("| {} |\n", row.join(" | ")));
        }

        output.push_str(&format!("\n**层数**: {}  \n", desc.layers.len()));
        output.push_str(&format!("**冻结层数**: {}\n", Self::frozen_count(&desc)));
        output
    }

    /// 文本表格（用于控制台输出）
    pub fn summary_string(&self) -> String {
        let desc = self.describe();
        let headers = ["层名称", "类型", "输入", "输出", "乘子"];
        let rows: Vec<[String; 5]> = desc.layers.iter().map(Self::row).collect();

        let widths: Vec<usize> = (0..headers.len())
            .map(|col| {
                rows.iter()
                    .map(|r| Self::display_width(&r[col]))
                    .chain(std::iter::once(Self::display_width(headers[col])))
                    .max()
                    .unwrap_or(4)
                    .max(4)
            })
            .collect();
        let border = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}\n", segments.join(mid))
        };
        let line = |cells: &[&str]| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!(" {c}{} ", " ".repeat(w - Self::display_width(c))))
                .collect();
            format!("│{}│\n", padded.join("│"))
        };

        let mut output = String::new();
        output.push_str(&border("┌", "┬", "┐"));
        output.push_str(&line(&headers));
        output.push_str(&border("├", "┼", "┤"));
        for row in &rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            output.push_str(&line(&cells));
        }
        output.push_str(&border("└", "┴", "┘"));

        output.push_str(&format!(
            "网络: {}  层数: {}  冻结层数: {}\n",
            desc.name,
            desc.layers.len(),
            Self::frozen_count(&desc)
        ));
        for input in &desc.inputs {
            output.push_str(&format!("输入: {} {:?}\n", input.name, input.shape));
        }
        output
    }

    fn row(layer: &LayerDescriptor) -> [String; 5] {
        [
            layer.name.clone(),
            layer.layer_type.clone(),
            Self::join_or_dash(&layer.bottom),
            Self::join_or_dash(&layer.top),
            Self::format_multipliers(&layer.multipliers),
        ]
    }

    /// 所有乘子的学习率都为0的层
    fn frozen_count(desc: &NetDescriptor) -> usize {
        desc.layers
            .iter()
            .filter(|l| !l.multipliers.is_empty() && l.multipliers.iter().all(|(lr, _)| *lr == Some(0.0)))
            .count()
    }

    fn join_or_dash(items: &[String]) -> String {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join(", ")
        }
    }

    fn format_multipliers(multipliers: &[(Option<f32>, Option<f32>)]) -> String {
        if multipliers.is_empty() {
            return "-".to_string();
        }
        let fmt = |v: Option<f32>| v.map_or_else(|| "_".to_string(), |v| v.to_string());
        multipliers
            .iter()
            .map(|&(lr, decay)| format!("({},{})", fmt(lr), fmt(decay)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 计算字符串显示宽度（考虑中文字符）
    fn display_width(s: &str) -> usize {
        s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
    }
}
