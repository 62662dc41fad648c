//! 存储文档模型
//!
//! 这里的结构体与文档存储中的字段一一对应（字段名保持存储中的原样），
//! 所有字段都是可选的：历史版本的文档形状各不相同。
//! 读取后通过 [`crate::model::Event::normalize`] 统一转换为领域模型。

use crate::date::{Timestamp, deserialize_lenient_timestamp};
use serde::{Deserialize, Deserializer, Serialize};

// =========================================================
// 宽松的文本反序列化
// =========================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

/// 文本字段在部分历史文档中以数字存储（如 `numeroEvento`）
fn deserialize_lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawText>::deserialize(deserializer)?;
    Ok(raw.map(|r| match r {
        RawText::Text(s) => s,
        RawText::Integer(n) => n.to_string(),
        RawText::Float(n) => n.to_string(),
        RawText::Flag(b) => b.to_string(),
    }))
}

// =========================================================
// 历史金额字段
// =========================================================

/// 旧版本的三个金额字段：先是单个数值，后来改成了数值列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Scalar(f64),
    List(Vec<f64>),
}

impl AmountField {
    /// 展开为金额列表，零值的标量视为空列表
    pub fn amounts(&self) -> Vec<f64> {
        match self {
            AmountField::Scalar(v) if *v != 0.0 => vec![*v],
            AmountField::Scalar(_) => Vec::new(),
            AmountField::List(list) => list.clone(),
        }
    }
}

// =========================================================
// 发票文档
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceDocument {
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub fecha: Option<Timestamp>,
    #[serde(deserialize_with = "deserialize_lenient_text")]
    pub numero_factura: Option<String>,
    pub subtotal: Option<f64>,
    /// 税率（百分比）
    pub iva: Option<f64>,
    pub total: Option<f64>,
    pub sin_pagar: Option<bool>,
    pub pagado: Option<bool>,
    pub comentarios: Option<String>,
}

// =========================================================
// 事件文档
// =========================================================

/// `eventos` 集合中的一个文档（不含 id）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventDocument {
    #[serde(deserialize_with = "deserialize_lenient_text")]
    pub numero_evento: Option<String>,
    pub nombre_evento: Option<String>,
    pub operador: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub fecha_inicio: Option<Timestamp>,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub fecha_final: Option<Timestamp>,
    pub zona: Option<String>,
    pub ciudad: Option<String>,
    #[serde(rename = "tieneOrdenSRE")]
    pub tiene_orden_sre: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient_text")]
    pub folio: Option<String>,
    pub carpeta_auditoria: Option<String>,
    pub observaciones: Option<String>,

    // 编辑器汇总中的手工金额
    pub subtotal_manual: Option<f64>,
    pub iva_manual: Option<f64>,

    // 当前形状：内嵌发票列表
    pub facturas: Option<Vec<InvoiceDocument>>,

    // 顶层标量：新建表单写入的事件金额（iva 为税额），
    // 编辑器保存后则是第一张发票的镜像（iva 为税率）
    #[serde(deserialize_with = "deserialize_lenient_text")]
    pub numero_factura: Option<String>,
    pub subtotal: Option<f64>,
    pub iva: Option<f64>,
    pub total: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub fecha_factura: Option<Timestamp>,
    pub sin_pagar: Option<bool>,
    pub pagado: Option<bool>,
    pub comentarios: Option<String>,

    // 旧形状：三个平铺金额字段
    pub monto_pendiente_facturar: Option<AmountField>,
    pub monto_facturado_no_pagado: Option<AmountField>,
    pub monto_facturado_pagado: Option<AmountField>,

    // 服务端写入的元数据
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub fecha_creacion: Option<Timestamp>,
    #[serde(
        alias = "fechaModificacion",
        deserialize_with = "deserialize_lenient_timestamp"
    )]
    pub fecha_actualizacion: Option<Timestamp>,
}

/// 带 id 的事件文档（存储返回的形状）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: String,
    #[serde(flatten)]
    pub document: EventDocument,
}

/// `usuarios` 集合中的一个文档
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatorDocument {
    #[serde(rename = "Nombre", default)]
    pub nombre: Option<String>,
}

/// 从操作员文档中提取可选项：跳过空名称，按字母排序
pub fn operator_names(docs: &[OperatorDocument]) -> Vec<String> {
    let mut names: Vec<String> = docs
        .iter()
        .filter_map(|d| d.nombre.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    names
}
