//! 新建事件表单

use crate::date::Timestamp;
use crate::document::EventDocument;
use crate::invoice::round2;
use chrono::NaiveDate;
use std::fmt;

/// 默认税率：小计变化时按 16% 自动推导税额
pub const AUTO_TAX_RATE: f64 = 16.0;

/// 保存成功后跳转回菜单前的倒计时（秒）
pub const REDIRECT_COUNTDOWN_SECS: u32 = 3;

/// 校验失败时字段高亮持续的毫秒数
pub const HIGHLIGHT_MS: u64 = 3000;

/// 表单中需要校验、可被高亮的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    EventNumber,
    StartDate,
    Name,
    Zone,
    Operator,
    Folio,
}

impl FormField {
    /// 固定的必填顺序，folio 仅在勾选订单时检查
    pub const REQUIRED_ORDER: [FormField; 5] = [
        FormField::EventNumber,
        FormField::StartDate,
        FormField::Name,
        FormField::Zone,
        FormField::Operator,
    ];

    /// 文档键名，同时用作输入框的 id
    pub fn key(&self) -> &'static str {
        match self {
            FormField::EventNumber => "numeroEvento",
            FormField::StartDate => "fechaInicio",
            FormField::Name => "nombreEvento",
            FormField::Zone => "zona",
            FormField::Operator => "operador",
            FormField::Folio => "folio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError {
    pub field: FormField,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Por favor complete todos los campos requeridos")
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEventForm {
    pub event_number: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub name: String,
    pub zone: String,
    pub city: String,
    pub operator: String,
    has_order: bool,
    folio: String,
    subtotal: f64,
    tax: f64,
    pub invoice_number: String,
    pub audit_folder: String,
    pub notes: String,
}

impl NewEventForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空全部字段
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_order(&self) -> bool {
        self.has_order
    }

    /// 取消勾选时清空并不再要求 folio
    pub fn set_has_order(&mut self, flag: bool) {
        self.has_order = flag;
        if !flag {
            self.folio.clear();
        }
    }

    pub fn folio(&self) -> &str {
        &self.folio
    }

    pub fn set_folio(&mut self, folio: String) {
        self.folio = folio;
    }

    pub fn folio_required(&self) -> bool {
        self.has_order
    }

    pub fn subtotal(&self) -> f64 {
        self.subtotal
    }

    /// 修改小计会覆盖税额为小计的 16%
    pub fn set_subtotal(&mut self, subtotal: f64) {
        self.subtotal = subtotal;
        self.tax = round2(subtotal * AUTO_TAX_RATE / 100.0);
    }

    pub fn tax(&self) -> f64 {
        self.tax
    }

    /// 手工覆盖税额
    pub fn set_tax(&mut self, tax: f64) {
        self.tax = tax;
    }

    pub fn total(&self) -> f64 {
        self.subtotal + self.tax
    }

    /// 按固定顺序返回第一个未填写的必填字段
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = FormField::REQUIRED_ORDER
            .into_iter()
            .find(|f| !self.is_filled(*f))
            .or_else(|| {
                (self.has_order && !self.is_filled(FormField::Folio)).then_some(FormField::Folio)
            });
        match missing {
            Some(field) => Err(ValidationError { field }),
            None => Ok(()),
        }
    }

    fn is_filled(&self, field: FormField) -> bool {
        match field {
            FormField::EventNumber => !self.event_number.trim().is_empty(),
            FormField::StartDate => self.start_date.is_some(),
            FormField::Name => !self.name.trim().is_empty(),
            FormField::Zone => !self.zone.trim().is_empty(),
            FormField::Operator => !self.operator.trim().is_empty(),
            FormField::Folio => !self.folio.trim().is_empty(),
        }
    }

    /// 校验后生成新文档；id 与时间戳由服务端分配
    pub fn to_document(&self) -> Result<EventDocument, ValidationError> {
        self.validate()?;

        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        Ok(EventDocument {
            numero_evento: Some(self.event_number.trim().to_string()),
            nombre_evento: Some(self.name.trim().to_string()),
            operador: Some(self.operator.trim().to_string()),
            fecha_inicio: self.start_date.map(Timestamp::from_date),
            fecha_final: self.end_date.map(Timestamp::from_date),
            zona: Some(self.zone.trim().to_string()),
            ciudad: optional(&self.city),
            tiene_orden_sre: Some(self.has_order),
            folio: if self.has_order {
                optional(&self.folio)
            } else {
                None
            },
            carpeta_auditoria: optional(&self.audit_folder),
            observaciones: optional(&self.notes),
            subtotal: Some(self.subtotal),
            iva: Some(self.tax),
            total: Some(self.total()),
            numero_factura: optional(&self.invoice_number),
            ..EventDocument::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_amount;

    fn filled() -> NewEventForm {
        NewEventForm {
            event_number: "EV-1".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            name: "Expo".into(),
            zone: "Norte".into(),
            operator: "Ana".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_subtotal_derives_tax_and_total() {
        let mut form = NewEventForm::new();
        form.set_subtotal(1000.0);
        assert_eq!(format!("{:.2}", form.tax()), "160.00");
        assert_eq!(format!("{:.2}", form.total()), "1160.00");

        form.set_tax(100.0);
        assert_eq!(form.total(), 1100.0);

        // 再次修改小计会覆盖手工税额
        form.set_subtotal(50.0);
        assert_eq!(form.tax(), 8.0);
    }

    #[test]
    fn test_required_order() {
        let form = NewEventForm::new();
        assert_eq!(form.validate().unwrap_err().field, FormField::EventNumber);

        let mut form = filled();
        form.zone = " ".into();
        form.operator.clear();
        assert_eq!(form.validate().unwrap_err().field, FormField::Zone);

        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_unchecking_order_clears_folio() {
        let mut form = filled();
        form.set_has_order(true);
        form.set_folio("SRE-1".into());
        form.set_has_order(false);
        assert_eq!(form.folio(), "");
        assert!(!form.folio_required());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_creation_scenario() {
        let mut form = filled();
        form.set_subtotal(1000.0);
        assert_eq!(format_amount(form.tax()), "160,00");
        assert_eq!(format_amount(form.total()), "1160,00");

        form.set_has_order(true);
        assert!(form.folio_required());
        let err = form.to_document().unwrap_err();
        assert_eq!(err.field, FormField::Folio);
        assert_eq!(err.field.key(), "folio");

        form.set_folio("SRE-2024-01".into());
        let doc = form.to_document().unwrap();
        assert_eq!(doc.folio.as_deref(), Some("SRE-2024-01"));
        assert_eq!(doc.tiene_orden_sre, Some(true));
        assert_eq!(doc.total, Some(1160.0));
        assert_eq!(doc.iva, Some(160.0));
        assert!(doc.facturas.is_none());
        assert!(doc.fecha_creacion.is_none());
    }

    #[test]
    fn test_reset() {
        let mut form = filled();
        form.set_subtotal(10.0);
        form.reset();
        assert_eq!(form, NewEventForm::default());
    }
}
