//! 领域模型
//!
//! `Event` / `Invoice` 是界面层唯一使用的形状。存储文档的各种历史形状
//! 在加载时由 [`Event::normalize`] 迁移一次，之后不再按字段是否存在做分支。

use crate::date::Timestamp;
use crate::document::{EventDocument, InvoiceDocument, StoredEvent};
use crate::invoice::invoice_total;
use chrono::NaiveDate;

// =========================================================
// 付款状态
// =========================================================

/// 发票的付款标记：{未付款, 已付款} 互斥，二者都未设置时为待定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Unpaid,
    Paid,
}

impl PaymentStatus {
    /// 从存储中的两个布尔标记恢复；两者同时为 true 时以已付款为准
    pub fn from_flags(unpaid: bool, paid: bool) -> Self {
        match (unpaid, paid) {
            (_, true) => PaymentStatus::Paid,
            (true, false) => PaymentStatus::Unpaid,
            (false, false) => PaymentStatus::Pending,
        }
    }

    /// 返回 `(unpaid, paid)`
    pub fn flags(&self) -> (bool, bool) {
        (self.is_unpaid(), self.is_paid())
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }

    pub fn is_unpaid(&self) -> bool {
        matches!(self, PaymentStatus::Unpaid)
    }
}

// =========================================================
// 发票
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Invoice {
    pub date: Option<NaiveDate>,
    pub number: String,
    pub subtotal: f64,
    /// 税率（百分比）
    pub rate: f64,
    pub status: PaymentStatus,
    pub comment: String,
}

impl Invoice {
    /// 完整精度的总额
    pub fn total(&self) -> f64 {
        invoice_total(self.subtotal, self.rate)
    }

    pub fn from_document(doc: &InvoiceDocument) -> Self {
        Self {
            date: doc.fecha.and_then(|ts| ts.to_date()),
            number: doc.numero_factura.clone().unwrap_or_default(),
            subtotal: doc.subtotal.unwrap_or_default(),
            rate: doc.iva.unwrap_or_default(),
            status: PaymentStatus::from_flags(
                doc.sin_pagar.unwrap_or(false),
                doc.pagado.unwrap_or(false),
            ),
            comment: doc.comentarios.clone().unwrap_or_default(),
        }
    }

    pub fn to_document(&self) -> InvoiceDocument {
        let (unpaid, paid) = self.status.flags();
        let comment = self.comment.trim();
        InvoiceDocument {
            fecha: self.date.map(Timestamp::from_date),
            numero_factura: Some(self.number.trim().to_string()),
            subtotal: Some(self.subtotal),
            iva: Some(self.rate),
            total: Some(self.total()),
            sin_pagar: Some(unpaid),
            pagado: Some(paid),
            comentarios: (!comment.is_empty()).then(|| comment.to_string()),
        }
    }
}

// =========================================================
// 历史形状
// =========================================================

/// 文档中发票数据的三种历史形状
#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceShape {
    /// 当前形状：内嵌发票列表
    Embedded(Vec<InvoiceDocument>),
    /// 旧形状：三个平铺的金额列表
    LegacyLists {
        pending: Vec<f64>,
        unpaid: Vec<f64>,
        paid: Vec<f64>,
    },
    /// 只有顶层的发票标量（新建表单写入的形状），可能为空
    ScalarOnly(Option<Invoice>),
}

impl InvoiceShape {
    /// 非空的内嵌列表优先，旧的金额字段被忽略；
    /// 空列表视为没有内嵌数据
    pub fn detect(doc: &EventDocument) -> Self {
        if let Some(list) = doc.facturas.as_ref().filter(|l| !l.is_empty()) {
            return InvoiceShape::Embedded(list.clone());
        }

        let amounts = |field: &Option<crate::document::AmountField>| {
            field.as_ref().map(|f| f.amounts()).unwrap_or_default()
        };
        let pending = amounts(&doc.monto_pendiente_facturar);
        let unpaid = amounts(&doc.monto_facturado_no_pagado);
        let paid = amounts(&doc.monto_facturado_pagado);

        if pending.is_empty() && unpaid.is_empty() && paid.is_empty() {
            InvoiceShape::ScalarOnly(Self::seed_from_scalars(doc))
        } else {
            InvoiceShape::LegacyLists {
                pending,
                unpaid,
                paid,
            }
        }
    }

    /// 由顶层标量生成一张发票
    ///
    /// 顶层的 `iva` 在新建文档中是税额，在编辑器保存后是税率，
    /// 因此优先用 `total - subtotal` 推出税额。
    fn seed_from_scalars(doc: &EventDocument) -> Option<Invoice> {
        let number = doc.numero_factura.as_deref().unwrap_or_default().trim();
        let subtotal = doc.subtotal.unwrap_or_default();
        let total = doc.total.unwrap_or_default();
        if number.is_empty() && subtotal == 0.0 && total == 0.0 {
            return None;
        }

        let (subtotal, rate) = if subtotal > 0.0 {
            let tax = if total > 0.0 {
                total - subtotal
            } else {
                doc.iva.unwrap_or_default()
            };
            (subtotal, tax.max(0.0) / subtotal * 100.0)
        } else {
            (total, 0.0)
        };

        Some(Invoice {
            date: doc.fecha_factura.and_then(|ts| ts.to_date()),
            number: number.to_string(),
            subtotal,
            rate,
            status: PaymentStatus::from_flags(
                doc.sin_pagar.unwrap_or(false),
                doc.pagado.unwrap_or(false),
            ),
            comment: doc.comentarios.clone().unwrap_or_default(),
        })
    }

    /// 迁移为发票列表
    ///
    /// 旧金额按税率 0 转成发票；待开票金额不是发票，由汇总重新推导。
    /// 第一张旧发票继承顶层的发票号。
    pub fn into_invoices(self, legacy_number: &str) -> Vec<Invoice> {
        match self {
            InvoiceShape::Embedded(docs) => docs.iter().map(Invoice::from_document).collect(),
            InvoiceShape::LegacyLists { unpaid, paid, .. } => {
                let unpaid = unpaid.into_iter().map(|v| (v, PaymentStatus::Unpaid));
                let paid = paid.into_iter().map(|v| (v, PaymentStatus::Paid));
                let mut invoices: Vec<Invoice> = unpaid
                    .chain(paid)
                    .map(|(subtotal, status)| Invoice {
                        subtotal,
                        status,
                        ..Invoice::default()
                    })
                    .collect();
                if let Some(first) = invoices.first_mut() {
                    first.number = legacy_number.to_string();
                }
                invoices
            }
            InvoiceShape::ScalarOnly(seed) => seed.into_iter().collect(),
        }
    }
}

// =========================================================
// 事件
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Event {
    pub id: String,
    pub number: String,
    pub name: String,
    pub operator: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub zone: String,
    pub city: String,
    pub has_order: bool,
    pub folio: String,
    pub audit_folder: String,
    pub notes: String,
    /// 事件级别的手工小计（`subtotalManual`）
    pub subtotal: f64,
    /// 事件级别的手工税额（`ivaManual`）
    pub tax: f64,
    /// 文档中存储的 total，仅在没有发票时用于展示
    pub stored_total: f64,
    /// 顶层的发票号（旧版读取方使用）
    pub legacy_invoice_number: String,
    pub invoices: Vec<Invoice>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl Event {
    /// 把任意历史形状的文档迁移为当前模型，缺失的文本字段归一为空串
    pub fn normalize(stored: StoredEvent) -> Self {
        let StoredEvent { id, document: doc } = stored;
        let legacy_invoice_number = doc.numero_factura.clone().unwrap_or_default();
        let shape = InvoiceShape::detect(&doc);

        // 内嵌形状下顶层的 subtotal/iva 是第一张发票的镜像，不能当作手工金额
        let (subtotal, tax) = match shape {
            InvoiceShape::Embedded(_) => (doc.subtotal_manual, doc.iva_manual),
            _ => (
                doc.subtotal_manual.or(doc.subtotal),
                doc.iva_manual.or(doc.iva),
            ),
        };
        let invoices = shape.into_invoices(&legacy_invoice_number);
        let text = |v: Option<String>| v.unwrap_or_default();

        Self {
            id,
            number: text(doc.numero_evento),
            name: text(doc.nombre_evento),
            operator: text(doc.operador),
            start_date: doc.fecha_inicio.and_then(|ts| ts.to_date()),
            end_date: doc.fecha_final.and_then(|ts| ts.to_date()),
            zone: text(doc.zona),
            city: text(doc.ciudad),
            has_order: doc.tiene_orden_sre.unwrap_or(false),
            folio: text(doc.folio),
            audit_folder: text(doc.carpeta_auditoria),
            notes: text(doc.observaciones),
            subtotal: subtotal.unwrap_or_default(),
            tax: tax.unwrap_or_default(),
            stored_total: doc.total.unwrap_or_default(),
            legacy_invoice_number,
            invoices,
            created_at: doc.fecha_creacion,
            updated_at: doc.fecha_actualizacion,
        }
    }

    /// 展示用总额：有发票时为发票总额之和，否则退回存储的 total
    pub fn display_total(&self) -> f64 {
        if self.invoices.is_empty() {
            self.stored_total
        } else {
            self.invoices
                .iter()
                .map(Invoice::total)
                .fold(0.0, |acc, v| acc + v)
        }
    }

    /// 所有可用于检索的发票号（顶层镜像 + 各发票）
    pub fn invoice_numbers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.legacy_invoice_number.as_str())
            .chain(self.invoices.iter().map(|i| i.number.as_str()))
            .filter(|n| !n.is_empty())
    }

    /// 首个发票号，用于列表展示
    pub fn primary_invoice_number(&self) -> &str {
        self.invoice_numbers().next().unwrap_or_default()
    }

    /// 开始日期与结束日期不同时才有意义的结束日期
    pub fn distinct_end_date(&self) -> Option<NaiveDate> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start != end => Some(end),
            (None, end) => end,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::AmountField;

    fn stored(document: EventDocument) -> StoredEvent {
        StoredEvent {
            id: "ev".into(),
            document,
        }
    }

    #[test]
    fn test_payment_flags_exclusive() {
        assert_eq!(PaymentStatus::from_flags(true, true), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_flags(true, false), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::from_flags(false, false), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::Paid.flags(), (false, true));
        assert_eq!(PaymentStatus::Unpaid.flags(), (true, false));
    }

    #[test]
    fn test_normalize_missing_text_fields() {
        let event = Event::normalize(stored(EventDocument::default()));
        assert_eq!(event.name, "");
        assert_eq!(event.operator, "");
        assert_eq!(event.legacy_invoice_number, "");
        assert!(event.invoices.is_empty());
        assert!(!event.has_order);
    }

    #[test]
    fn test_normalize_embedded_wins_over_legacy() {
        let doc = EventDocument {
            facturas: Some(vec![InvoiceDocument {
                numero_factura: Some("A1".into()),
                subtotal: Some(1000.0),
                iva: Some(16.0),
                pagado: Some(true),
                ..Default::default()
            }]),
            monto_facturado_no_pagado: Some(AmountField::List(vec![50.0, 60.0])),
            ..Default::default()
        };
        let event = Event::normalize(stored(doc));
        assert_eq!(event.invoices.len(), 1);
        assert_eq!(event.invoices[0].number, "A1");
        assert_eq!(event.invoices[0].status, PaymentStatus::Paid);
        assert!((event.display_total() - 1160.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_legacy_lists() {
        let doc = EventDocument {
            numero_factura: Some("OLD-9".into()),
            monto_pendiente_facturar: Some(AmountField::Scalar(300.0)),
            monto_facturado_no_pagado: Some(AmountField::List(vec![100.0])),
            monto_facturado_pagado: Some(AmountField::List(vec![200.0, 50.0])),
            total: Some(9999.0),
            ..Default::default()
        };
        let event = Event::normalize(stored(doc));
        let statuses: Vec<_> = event.invoices.iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            vec![
                PaymentStatus::Unpaid,
                PaymentStatus::Paid,
                PaymentStatus::Paid
            ]
        );
        assert_eq!(event.invoices[0].number, "OLD-9");
        assert_eq!(event.invoices[1].number, "");
        assert!((event.display_total() - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_total_falls_back_to_stored_scalar() {
        let event = Event {
            stored_total: 1160.0,
            ..Default::default()
        };
        assert_eq!(event.display_total(), 1160.0);
        assert!(Event::default().display_total().is_sign_positive());
    }

    #[test]
    fn test_normalize_reads_editor_saved_document() {
        let json = r#"{
            "id": "ev7",
            "nombreEvento": "Feria",
            "subtotalManual": 2000,
            "ivaManual": 320,
            "numeroFactura": "A1",
            "subtotal": 1000,
            "iva": 16,
            "total": 1160,
            "facturas": [
                {"fecha": "2024-03-15", "numeroFactura": "A1", "subtotal": 1000, "iva": 16,
                 "total": 1160, "sinPagar": false, "pagado": true, "comentarios": "primer pago"}
            ]
        }"#;
        let stored: StoredEvent = serde_json::from_str(json).unwrap();
        let event = Event::normalize(stored);

        assert_eq!(event.invoices.len(), 1);
        let invoice = &event.invoices[0];
        assert_eq!(invoice.number, "A1");
        assert_eq!(invoice.status, PaymentStatus::Paid);
        assert_eq!(invoice.comment, "primer pago");
        assert_eq!(invoice.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(event.subtotal, 2000.0);
        assert_eq!(event.tax, 320.0);

        let summary = crate::invoice::FinancialSummary::compute(
            &event.invoices,
            event.subtotal,
            event.tax,
        );
        assert!((summary.grand_total - 2320.0).abs() < 1e-9);
        assert!((summary.total_paid - 1160.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_embedded_ignores_mirrored_scalars_as_manual() {
        let doc = EventDocument {
            subtotal: Some(1000.0),
            iva: Some(16.0),
            facturas: Some(vec![InvoiceDocument {
                subtotal: Some(1000.0),
                iva: Some(16.0),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let event = Event::normalize(stored(doc));
        assert_eq!(event.subtotal, 0.0);
        assert_eq!(event.tax, 0.0);
    }

    #[test]
    fn test_empty_embedded_list_falls_through_to_legacy() {
        let doc = EventDocument {
            facturas: Some(Vec::new()),
            monto_facturado_no_pagado: Some(AmountField::List(vec![100.0])),
            monto_facturado_pagado: Some(AmountField::Scalar(250.0)),
            ..Default::default()
        };
        let event = Event::normalize(stored(doc));
        let statuses: Vec<_> = event.invoices.iter().map(|i| i.status).collect();
        assert_eq!(statuses, vec![PaymentStatus::Unpaid, PaymentStatus::Paid]);
        assert!((event.display_total() - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_scalar_document_seeds_one_invoice() {
        // 新建表单写入的形状：iva 为税额，没有 facturas
        let doc = EventDocument {
            numero_factura: Some("FAC-9".into()),
            subtotal: Some(1000.0),
            iva: Some(160.0),
            total: Some(1160.0),
            pagado: Some(true),
            comentarios: Some("contado".into()),
            ..Default::default()
        };
        let event = Event::normalize(stored(doc));
        assert_eq!(event.invoices.len(), 1);
        let invoice = &event.invoices[0];
        assert_eq!(invoice.number, "FAC-9");
        assert!((invoice.rate - 16.0).abs() < 1e-9);
        assert_eq!(invoice.status, PaymentStatus::Paid);
        assert_eq!(invoice.comment, "contado");
        assert!((event.display_total() - 1160.0).abs() < 1e-9);
        assert_eq!(event.subtotal, 1000.0);
        assert_eq!(event.tax, 160.0);
    }

    #[test]
    fn test_scalar_document_without_subtotal_keeps_total() {
        let doc = EventDocument {
            total: Some(500.0),
            ..Default::default()
        };
        let event = Event::normalize(stored(doc));
        assert_eq!(event.invoices.len(), 1);
        assert_eq!(event.invoices[0].subtotal, 500.0);
        assert_eq!(event.invoices[0].rate, 0.0);
        assert_eq!(event.display_total(), 500.0);
    }

    #[test]
    fn test_invoice_document_round_trip() {
        let invoice = Invoice {
            date: NaiveDate::from_ymd_opt(2024, 5, 2),
            number: "B-7".into(),
            subtotal: 250.0,
            rate: 8.0,
            status: PaymentStatus::Unpaid,
            comment: "anticipo".into(),
        };
        let doc = invoice.to_document();
        assert_eq!(doc.total, Some(270.0));
        assert_eq!(doc.sin_pagar, Some(true));
        assert_eq!(doc.pagado, Some(false));
        assert_eq!(Invoice::from_document(&doc), invoice);
    }

    #[test]
    fn test_distinct_end_date() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1);
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 3);
        let mut event = Event {
            start_date: d1,
            end_date: d1,
            ..Default::default()
        };
        assert_eq!(event.distinct_end_date(), None);
        event.end_date = d2;
        assert_eq!(event.distinct_end_date(), d2);
    }
}
