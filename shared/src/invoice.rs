//! 发票汇总与发票行编辑
//!
//! `InvoiceList` 持有编辑表单中的发票行，并在每次结构变化或字段修改后
//! 重新推导 `FinancialSummary`。汇总是缓存字段，所有修改路径都经过
//! `recompute`，因此不会出现过期的汇总。

use crate::model::{Invoice, PaymentStatus};
use chrono::NaiveDate;
use std::fmt;

/// 计算发票总额：`subtotal + subtotal * rate / 100`，保留完整精度
pub fn invoice_total(subtotal: f64, rate: f64) -> f64 {
    subtotal + subtotal * rate / 100.0
}

/// 四舍五入到两位小数，仅用于展示
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =========================================================
// 财务汇总
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FinancialSummary {
    /// 已付款发票的总额之和
    pub total_paid: f64,
    /// 已开票未付款发票的总额之和
    pub total_unpaid: f64,
    /// 手工小计 + 手工税额
    pub grand_total: f64,
    /// 待开票金额，展示时下限为 0
    pub pending_to_invoice: f64,
}

impl FinancialSummary {
    pub fn compute(invoices: &[Invoice], manual_subtotal: f64, manual_tax: f64) -> Self {
        let sum_where = |status: PaymentStatus| -> f64 {
            invoices
                .iter()
                .filter(|i| i.status == status)
                .map(Invoice::total)
                .fold(0.0, |acc, v| acc + v)
        };
        let total_paid = sum_where(PaymentStatus::Paid);
        let total_unpaid = sum_where(PaymentStatus::Unpaid);
        let grand_total = manual_subtotal + manual_tax;
        let pending_to_invoice = (grand_total - total_paid - total_unpaid).max(0.0);

        Self {
            total_paid,
            total_unpaid,
            grand_total,
            pending_to_invoice,
        }
    }
}

// =========================================================
// 发票行编辑
// =========================================================

/// 单个发票字段的修改
#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceEdit {
    Date(Option<NaiveDate>),
    Number(String),
    Subtotal(f64),
    Rate(f64),
    Paid(bool),
    Unpaid(bool),
    Comment(String),
}

/// 发票行操作被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowError {
    /// 试图删除最后一行
    LastRow,
    /// 行号不存在
    UnknownRow(u32),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::LastRow => write!(f, "Debe existir al menos una factura"),
            RowError::UnknownRow(seq) => write!(f, "La factura #{} no existe", seq),
        }
    }
}

impl std::error::Error for RowError {}

/// 编辑表单中的一行发票，`seq` 仅用于展示和定位
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRow {
    pub seq: u32,
    pub invoice: Invoice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceList {
    rows: Vec<InvoiceRow>,
    next_seq: u32,
    manual_subtotal: f64,
    manual_tax: f64,
    summary: FinancialSummary,
}

impl InvoiceList {
    /// 创建发票行列表；传入空列表时补一行空白发票
    pub fn new(invoices: Vec<Invoice>, manual_subtotal: f64, manual_tax: f64) -> Self {
        let mut list = Self {
            rows: Vec::with_capacity(invoices.len().max(1)),
            next_seq: 1,
            manual_subtotal,
            manual_tax,
            summary: FinancialSummary::default(),
        };
        for invoice in invoices {
            list.push(invoice);
        }
        if list.rows.is_empty() {
            list.push(Invoice::default());
        }
        list.recompute();
        list
    }

    pub fn rows(&self) -> &[InvoiceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, seq: u32) -> Option<&Invoice> {
        self.rows.iter().find(|r| r.seq == seq).map(|r| &r.invoice)
    }

    pub fn summary(&self) -> FinancialSummary {
        self.summary
    }

    pub fn manual_subtotal(&self) -> f64 {
        self.manual_subtotal
    }

    pub fn manual_tax(&self) -> f64 {
        self.manual_tax
    }

    /// 按当前顺序导出发票
    pub fn invoices(&self) -> Vec<Invoice> {
        self.rows.iter().map(|r| r.invoice.clone()).collect()
    }

    /// 所有发票总额之和（保存时写入文档的 total）
    pub fn invoices_total(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.invoice.total())
            .fold(0.0, |acc, v| acc + v)
    }

    /// 追加一行零值、无标记的发票，返回新行号
    pub fn add(&mut self) -> u32 {
        let seq = self.push(Invoice::default());
        self.recompute();
        seq
    }

    /// 删除一行；只剩一行时拒绝
    pub fn remove(&mut self, seq: u32) -> Result<(), RowError> {
        let index = self
            .rows
            .iter()
            .position(|r| r.seq == seq)
            .ok_or(RowError::UnknownRow(seq))?;
        if self.rows.len() <= 1 {
            return Err(RowError::LastRow);
        }
        self.rows.remove(index);
        self.recompute();
        Ok(())
    }

    /// 修改一行发票的某个字段
    pub fn edit(&mut self, seq: u32, edit: InvoiceEdit) -> Result<(), RowError> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.seq == seq)
            .ok_or(RowError::UnknownRow(seq))?;
        let invoice = &mut row.invoice;

        match edit {
            InvoiceEdit::Date(date) => invoice.date = date,
            InvoiceEdit::Number(number) => invoice.number = number,
            InvoiceEdit::Subtotal(v) => invoice.subtotal = v,
            InvoiceEdit::Rate(v) => invoice.rate = v,
            InvoiceEdit::Paid(true) => invoice.status = PaymentStatus::Paid,
            InvoiceEdit::Unpaid(true) => invoice.status = PaymentStatus::Unpaid,
            InvoiceEdit::Paid(false) if invoice.status.is_paid() => {
                invoice.status = PaymentStatus::Pending
            }
            InvoiceEdit::Unpaid(false) if invoice.status.is_unpaid() => {
                invoice.status = PaymentStatus::Pending
            }
            InvoiceEdit::Paid(false) | InvoiceEdit::Unpaid(false) => {}
            InvoiceEdit::Comment(comment) => invoice.comment = comment,
        }

        self.recompute();
        Ok(())
    }

    pub fn set_manual_subtotal(&mut self, value: f64) {
        self.manual_subtotal = value;
        self.recompute();
    }

    pub fn set_manual_tax(&mut self, value: f64) {
        self.manual_tax = value;
        self.recompute();
    }

    fn push(&mut self, invoice: Invoice) -> u32 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.rows.push(InvoiceRow { seq, invoice });
        seq
    }

    fn recompute(&mut self) {
        let invoices: Vec<Invoice> = self.invoices();
        self.summary = FinancialSummary::compute(&invoices, self.manual_subtotal, self.manual_tax);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_invoice_total_cases() {
        assert_eq!(invoice_total(1000.0, 0.0), 1000.0);
        assert_eq!(invoice_total(0.0, 16.0), 0.0);
        assert_eq!(round2(invoice_total(1000.0, 16.0)), 1160.0);
        assert_eq!(format!("{:.2}", invoice_total(1000.0, 16.0)), "1160.00");
    }

    #[test]
    fn test_full_precision_retained() {
        let total = invoice_total(0.1, 33.333);
        assert!(approx(total, 0.1 + 0.1 * 33.333 / 100.0));
        assert_eq!(round2(total), 0.13);
    }

    #[test]
    fn test_summary_formula() {
        let invoices = vec![
            Invoice {
                subtotal: 1000.0,
                rate: 16.0,
                status: PaymentStatus::Paid,
                ..Default::default()
            },
            Invoice {
                subtotal: 500.0,
                rate: 0.0,
                status: PaymentStatus::Unpaid,
                ..Default::default()
            },
            Invoice {
                subtotal: 999.0,
                rate: 16.0,
                status: PaymentStatus::Pending,
                ..Default::default()
            },
        ];
        let s = FinancialSummary::compute(&invoices, 2000.0, 320.0);
        assert!(approx(s.total_paid, 1160.0));
        assert!(approx(s.total_unpaid, 500.0));
        assert!(approx(s.grand_total, 2320.0));
        assert!(approx(s.pending_to_invoice, 660.0));
    }

    #[test]
    fn test_pending_floored_at_zero() {
        let invoices = vec![Invoice {
            subtotal: 5000.0,
            status: PaymentStatus::Paid,
            ..Default::default()
        }];
        let s = FinancialSummary::compute(&invoices, 100.0, 16.0);
        assert_eq!(s.pending_to_invoice, 0.0);
    }

    #[test]
    fn test_empty_sums_are_positive_zero() {
        let s = FinancialSummary::compute(&[], 0.0, 0.0);
        assert!(s.total_paid.is_sign_positive());
        assert!(s.total_unpaid.is_sign_positive());
        assert_eq!(crate::format::format_currency(s.total_paid), "$0,00");

        let list = InvoiceList::new(Vec::new(), 0.0, 0.0);
        assert!(list.invoices_total().is_sign_positive());
    }

    #[test]
    fn test_new_list_has_one_row() {
        let list = InvoiceList::new(Vec::new(), 0.0, 0.0);
        assert_eq!(list.len(), 1);
        assert_eq!(list.rows()[0].seq, 1);
        assert_eq!(list.rows()[0].invoice, Invoice::default());
    }

    #[test]
    fn test_add_appends_fresh_sequence() {
        let mut list = InvoiceList::new(Vec::new(), 0.0, 0.0);
        let a = list.add();
        let b = list.add();
        assert_eq!((a, b), (2, 3));
        list.remove(a).unwrap();
        let c = list.add();
        assert_eq!(c, 4);
        let seqs: Vec<u32> = list.rows().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![1, 3, 4]);
    }

    #[test]
    fn test_remove_last_row_refused() {
        let mut list = InvoiceList::new(Vec::new(), 0.0, 0.0);
        assert_eq!(list.remove(1), Err(RowError::LastRow));
        assert_eq!(list.len(), 1);
        assert_eq!(list.remove(42), Err(RowError::UnknownRow(42)));
    }

    #[test]
    fn test_paid_unpaid_exclusive_per_row() {
        let mut list = InvoiceList::new(Vec::new(), 0.0, 0.0);
        let second = list.add();

        list.edit(1, InvoiceEdit::Paid(true)).unwrap();
        list.edit(second, InvoiceEdit::Unpaid(true)).unwrap();
        assert_eq!(list.get(1).unwrap().status, PaymentStatus::Paid);
        assert_eq!(list.get(second).unwrap().status, PaymentStatus::Unpaid);

        list.edit(1, InvoiceEdit::Unpaid(true)).unwrap();
        assert_eq!(list.get(1).unwrap().status.flags(), (true, false));
        assert_eq!(list.get(second).unwrap().status, PaymentStatus::Unpaid);

        // 取消另一个标记不影响当前状态
        list.edit(1, InvoiceEdit::Paid(false)).unwrap();
        assert_eq!(list.get(1).unwrap().status, PaymentStatus::Unpaid);
        list.edit(1, InvoiceEdit::Unpaid(false)).unwrap();
        assert_eq!(list.get(1).unwrap().status, PaymentStatus::Pending);
    }

    #[test]
    fn test_summary_tracks_every_mutation() {
        let mut list = InvoiceList::new(Vec::new(), 1000.0, 160.0);
        assert!(approx(list.summary().pending_to_invoice, 1160.0));

        list.edit(1, InvoiceEdit::Subtotal(500.0)).unwrap();
        list.edit(1, InvoiceEdit::Rate(16.0)).unwrap();
        assert!(approx(list.summary().pending_to_invoice, 1160.0));

        list.edit(1, InvoiceEdit::Paid(true)).unwrap();
        assert!(approx(list.summary().total_paid, 580.0));
        assert!(approx(list.summary().pending_to_invoice, 580.0));

        let second = list.add();
        list.edit(second, InvoiceEdit::Subtotal(100.0)).unwrap();
        list.edit(second, InvoiceEdit::Unpaid(true)).unwrap();
        assert!(approx(list.summary().total_unpaid, 100.0));
        assert!(approx(list.summary().pending_to_invoice, 480.0));

        list.remove(1).unwrap();
        assert_eq!(list.summary().total_paid, 0.0);
        assert!(approx(list.summary().pending_to_invoice, 1060.0));

        list.set_manual_tax(0.0);
        assert!(approx(list.summary().grand_total, 1000.0));
        assert!(approx(list.summary().pending_to_invoice, 900.0));
    }
}
