//! 事件编辑器（编辑弹窗）的状态机

use crate::date::Timestamp;
use crate::document::EventDocument;
use crate::invoice::{FinancialSummary, InvoiceEdit, InvoiceList, RowError};
use crate::model::Event;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Editable,
    ReadOnly,
}

impl EditorMode {
    pub fn is_read_only(&self) -> bool {
        matches!(self, EditorMode::ReadOnly)
    }
}

// =========================================================
// 字段到文档键的映射
// =========================================================

/// 编辑器中的文本字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    Number,
    Name,
    Operator,
    Zone,
    City,
    Folio,
    AuditFolder,
    Notes,
}

impl EditField {
    pub const ALL: [EditField; 8] = [
        EditField::Number,
        EditField::Name,
        EditField::Operator,
        EditField::Zone,
        EditField::City,
        EditField::Folio,
        EditField::AuditFolder,
        EditField::Notes,
    ];

    /// 存储文档中的键名
    pub fn key(&self) -> &'static str {
        match self {
            EditField::Number => "numeroEvento",
            EditField::Name => "nombreEvento",
            EditField::Operator => "operador",
            EditField::Zone => "zona",
            EditField::City => "ciudad",
            EditField::Folio => "folio",
            EditField::AuditFolder => "carpetaAuditoria",
            EditField::Notes => "observaciones",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditField::Number => "Número de evento",
            EditField::Name => "Nombre del evento",
            EditField::Operator => "Operador",
            EditField::Zone => "Zona",
            EditField::City => "Ciudad",
            EditField::Folio => "Folio",
            EditField::AuditFolder => "Carpeta de auditoría",
            EditField::Notes => "Observaciones",
        }
    }

    fn slot<'a>(&self, event: &'a mut Event) -> &'a mut String {
        match self {
            EditField::Number => &mut event.number,
            EditField::Name => &mut event.name,
            EditField::Operator => &mut event.operator,
            EditField::Zone => &mut event.zone,
            EditField::City => &mut event.city,
            EditField::Folio => &mut event.folio,
            EditField::AuditFolder => &mut event.audit_folder,
            EditField::Notes => &mut event.notes,
        }
    }

    pub fn value<'a>(&self, event: &'a Event) -> &'a str {
        match self {
            EditField::Number => &event.number,
            EditField::Name => &event.name,
            EditField::Operator => &event.operator,
            EditField::Zone => &event.zone,
            EditField::City => &event.city,
            EditField::Folio => &event.folio,
            EditField::AuditFolder => &event.audit_folder,
            EditField::Notes => &event.notes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Start,
    End,
}

impl DateField {
    pub fn key(&self) -> &'static str {
        match self {
            DateField::Start => "fechaInicio",
            DateField::End => "fechaFinal",
        }
    }
}

// =========================================================
// 动作与错误
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    SetText(EditField, String),
    SetDate(DateField, Option<NaiveDate>),
    SetHasOrder(bool),
    SetSubtotal(f64),
    SetTax(f64),
    AddInvoice,
    RemoveInvoice(u32),
    EditInvoice(u32, InvoiceEdit),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    ReadOnly,
    Row(RowError),
    MissingRequired,
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::ReadOnly => write!(f, "El evento está en modo de solo lectura"),
            EditorError::Row(e) => write!(f, "{}", e),
            EditorError::MissingRequired => {
                write!(f, "Por favor complete todos los campos requeridos")
            }
        }
    }
}

impl std::error::Error for EditorError {}

impl From<RowError> for EditorError {
    fn from(e: RowError) -> Self {
        EditorError::Row(e)
    }
}

// =========================================================
// 编辑器状态
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    mode: EditorMode,
    draft: Event,
    invoices: InvoiceList,
}

impl EditorState {
    /// 以给定模式打开一个事件；没有发票的事件会得到一行空白发票
    pub fn open(event: Event, mode: EditorMode) -> Self {
        let invoices = InvoiceList::new(event.invoices.clone(), event.subtotal, event.tax);
        Self {
            mode,
            draft: event,
            invoices,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    pub fn event_id(&self) -> &str {
        &self.draft.id
    }

    pub fn draft(&self) -> &Event {
        &self.draft
    }

    pub fn invoices(&self) -> &InvoiceList {
        &self.invoices
    }

    pub fn summary(&self) -> FinancialSummary {
        self.invoices.summary()
    }

    /// 只读模式下拒绝所有修改
    pub fn apply(&mut self, action: EditorAction) -> Result<(), EditorError> {
        if self.mode.is_read_only() {
            return Err(EditorError::ReadOnly);
        }

        match action {
            EditorAction::SetText(field, value) => *field.slot(&mut self.draft) = value,
            EditorAction::SetDate(DateField::Start, date) => self.draft.start_date = date,
            EditorAction::SetDate(DateField::End, date) => self.draft.end_date = date,
            EditorAction::SetHasOrder(flag) => self.draft.has_order = flag,
            EditorAction::SetSubtotal(v) => {
                self.draft.subtotal = v;
                self.invoices.set_manual_subtotal(v);
            }
            EditorAction::SetTax(v) => {
                self.draft.tax = v;
                self.invoices.set_manual_tax(v);
            }
            EditorAction::AddInvoice => {
                self.invoices.add();
            }
            EditorAction::RemoveInvoice(seq) => self.invoices.remove(seq)?,
            EditorAction::EditInvoice(seq, edit) => self.invoices.edit(seq, edit)?,
        }
        Ok(())
    }

    /// 校验并生成完整覆盖写入的文档
    ///
    /// 手工金额写入 `subtotalManual` / `ivaManual`；第一张发票的号码、小计、
    /// 税率镜像到顶层字段，total 为所有发票总额之和。
    pub fn build_update(&self) -> Result<EventDocument, EditorError> {
        if self.mode.is_read_only() {
            return Err(EditorError::ReadOnly);
        }
        if self.draft.name.trim().is_empty() || self.draft.operator.trim().is_empty() {
            return Err(EditorError::MissingRequired);
        }

        let text = |field: EditField| Some(field.value(&self.draft).trim().to_string());
        let invoices = self.invoices.invoices();
        let first = invoices.first();

        Ok(EventDocument {
            numero_evento: text(EditField::Number),
            nombre_evento: text(EditField::Name),
            operador: text(EditField::Operator),
            fecha_inicio: self.draft.start_date.map(Timestamp::from_date),
            fecha_final: self.draft.end_date.map(Timestamp::from_date),
            zona: text(EditField::Zone),
            ciudad: text(EditField::City),
            tiene_orden_sre: Some(self.draft.has_order),
            folio: text(EditField::Folio),
            carpeta_auditoria: text(EditField::AuditFolder),
            observaciones: text(EditField::Notes),
            subtotal_manual: Some(self.invoices.manual_subtotal()),
            iva_manual: Some(self.invoices.manual_tax()),
            facturas: Some(invoices.iter().map(|i| i.to_document()).collect()),
            numero_factura: first.map(|i| i.number.trim().to_string()),
            subtotal: first.map(|i| i.subtotal),
            iva: first.map(|i| i.rate),
            total: Some(self.invoices.invoices_total()),
            fecha_creacion: self.draft.created_at,
            ..EventDocument::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StoredEvent;
    use crate::model::{Invoice, PaymentStatus};

    fn sample_event() -> Event {
        Event {
            id: "ev1".into(),
            name: "Congreso".into(),
            operator: "Ana".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            subtotal: 2000.0,
            tax: 320.0,
            invoices: vec![
                Invoice {
                    number: "A1".into(),
                    subtotal: 1000.0,
                    rate: 16.0,
                    status: PaymentStatus::Paid,
                    comment: "primer pago".into(),
                    ..Default::default()
                },
                Invoice {
                    number: "A2".into(),
                    subtotal: 500.0,
                    rate: 0.0,
                    status: PaymentStatus::Unpaid,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_field_keys_are_unique() {
        let mut keys: Vec<_> = EditField::ALL.iter().map(|f| f.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), EditField::ALL.len());
        assert_eq!(EditField::Name.key(), "nombreEvento");
        assert_eq!(DateField::End.key(), "fechaFinal");
    }

    #[test]
    fn test_read_only_rejects_edits() {
        let mut editor = EditorState::open(sample_event(), EditorMode::ReadOnly);
        assert_eq!(
            editor.apply(EditorAction::SetText(EditField::Name, "x".into())),
            Err(EditorError::ReadOnly)
        );
        assert_eq!(editor.apply(EditorAction::AddInvoice), Err(EditorError::ReadOnly));
        assert_eq!(editor.draft().name, "Congreso");
        assert_eq!(editor.build_update(), Err(EditorError::ReadOnly));

        editor.set_mode(EditorMode::Editable);
        assert!(editor.apply(EditorAction::AddInvoice).is_ok());
        assert_eq!(editor.invoices().len(), 3);
    }

    #[test]
    fn test_open_without_invoices_has_one_row() {
        let event = Event {
            name: "x".into(),
            ..Default::default()
        };
        let editor = EditorState::open(event, EditorMode::Editable);
        assert_eq!(editor.invoices().len(), 1);
    }

    #[test]
    fn test_summary_follows_actions() {
        let mut editor = EditorState::open(sample_event(), EditorMode::Editable);
        assert!((editor.summary().pending_to_invoice - 660.0).abs() < 1e-9);

        editor
            .apply(EditorAction::EditInvoice(2, InvoiceEdit::Paid(true)))
            .unwrap();
        assert!((editor.summary().total_paid - 1660.0).abs() < 1e-9);
        assert_eq!(editor.summary().total_unpaid, 0.0);

        editor.apply(EditorAction::SetTax(0.0)).unwrap();
        assert_eq!(editor.summary().pending_to_invoice, 340.0);

        editor.apply(EditorAction::RemoveInvoice(1)).unwrap();
        assert_eq!(
            editor.apply(EditorAction::RemoveInvoice(2)),
            Err(EditorError::Row(RowError::LastRow))
        );
        assert_eq!(editor.invoices().len(), 1);
    }

    #[test]
    fn test_required_fields_block_save() {
        let mut editor = EditorState::open(sample_event(), EditorMode::Editable);
        editor
            .apply(EditorAction::SetText(EditField::Operator, "   ".into()))
            .unwrap();
        let err = editor.build_update().unwrap_err();
        assert_eq!(err, EditorError::MissingRequired);
        assert_eq!(
            err.to_string(),
            "Por favor complete todos los campos requeridos"
        );
    }

    #[test]
    fn test_build_update_mirrors_first_invoice() {
        let editor = EditorState::open(sample_event(), EditorMode::Editable);
        let doc = editor.build_update().unwrap();
        assert_eq!(doc.numero_factura.as_deref(), Some("A1"));
        assert_eq!(doc.subtotal, Some(1000.0));
        assert_eq!(doc.iva, Some(16.0));
        assert!((doc.total.unwrap() - 1660.0).abs() < 1e-9);
        assert_eq!(doc.subtotal_manual, Some(2000.0));
        assert_eq!(doc.iva_manual, Some(320.0));

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["subtotalManual"], 2000.0);
        assert_eq!(json["ivaManual"], 320.0);
        assert_eq!(json["facturas"][0]["numeroFactura"], "A1");
        assert_eq!(json["facturas"][0]["pagado"], true);
        assert_eq!(json["facturas"][0]["sinPagar"], false);
        assert!(doc.monto_facturado_pagado.is_none());
        assert_eq!(doc.facturas.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_save_reload_round_trip() {
        let mut editor = EditorState::open(sample_event(), EditorMode::Editable);
        editor
            .apply(EditorAction::SetText(EditField::Folio, " SRE-9 ".into()))
            .unwrap();
        editor.apply(EditorAction::SetHasOrder(true)).unwrap();
        editor
            .apply(EditorAction::EditInvoice(
                2,
                InvoiceEdit::Comment("saldo".into()),
            ))
            .unwrap();

        let doc = editor.build_update().unwrap();
        let json = serde_json::to_string(&StoredEvent {
            id: "ev1".into(),
            document: doc,
        })
        .unwrap();
        let reloaded = Event::normalize(serde_json::from_str(&json).unwrap());

        assert_eq!(reloaded.folio, "SRE-9");
        assert!(reloaded.has_order);
        assert_eq!(reloaded.name, "Congreso");
        assert_eq!(reloaded.start_date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(reloaded.invoices, editor.invoices().invoices());
        assert_eq!(reloaded.invoices[1].comment, "saldo");
        assert_eq!(reloaded.subtotal, 2000.0);
        assert_eq!(reloaded.tax, 320.0);
        assert!((reloaded.display_total() - 1660.0).abs() < 1e-9);
    }

    #[test]
    fn test_created_event_survives_first_edit() {
        let mut form = crate::creation::NewEventForm::new();
        form.event_number = "EV-9".into();
        form.start_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        form.name = "Expo".into();
        form.zone = "Norte".into();
        form.operator = "Ana".into();
        form.invoice_number = "FAC-9".into();
        form.set_subtotal(1000.0);
        let created = Event::normalize(StoredEvent {
            id: "ev9".into(),
            document: form.to_document().unwrap(),
        });
        assert!((created.display_total() - 1160.0).abs() < 1e-9);
        assert_eq!(created.primary_invoice_number(), "FAC-9");

        let mut editor = EditorState::open(created, EditorMode::Editable);
        assert_eq!(editor.invoices().len(), 1);
        assert!((editor.summary().grand_total - 1160.0).abs() < 1e-9);
        editor
            .apply(EditorAction::SetText(EditField::Name, "Expo 2024".into()))
            .unwrap();

        let doc = editor.build_update().unwrap();
        let json = serde_json::to_string(&StoredEvent {
            id: "ev9".into(),
            document: doc,
        })
        .unwrap();
        let reloaded = Event::normalize(serde_json::from_str(&json).unwrap());

        assert_eq!(reloaded.name, "Expo 2024");
        assert!((reloaded.display_total() - 1160.0).abs() < 1e-9);
        assert_eq!(reloaded.primary_invoice_number(), "FAC-9");
        assert_eq!(reloaded.invoices[0].number, "FAC-9");
        assert_eq!(reloaded.subtotal, 1000.0);
        assert_eq!(reloaded.tax, 160.0);
    }
}
