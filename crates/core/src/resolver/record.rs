//! Mapping of a tracking service response onto form fields.

use serde_json::Value;

use crate::form::{
    format_currency, format_storage_date, format_weight, join_paragraphs, FormField,
    FormFieldMap,
};

use super::json::JsonLookup;
use super::types::ResolutionStatus;

/// History operation type meaning "arrived at the delivery office".
pub const ARRIVED_OPERATION_TYPE: i64 = 8;
/// History operation attribute meaning "awaiting pickup".
pub const ARRIVED_OPERATION_ATTR: i64 = 2;

/// Source of the return fee. Whether the service reports the return fee in
/// this field has never been confirmed against a real notice.
pub const RETURN_FEE_SOURCE_FIELD_UNVERIFIED: &str = "ReturningRate";

/// Fill `fields` from a tracking response.
///
/// Fields are written in order; when the response stops early the fields
/// written so far are kept and the returned status says where it stopped.
pub fn populate_fields(response: &Value, fields: &mut FormFieldMap) -> ResolutionStatus {
    let record = JsonLookup::new(response).get("response").at(0);

    let history = record
        .path(&["trackingItem", "trackingHistoryItemList"])
        .items();
    if history.is_empty() {
        return ResolutionStatus::NoHistory;
    }
    if !is_ready_for_pickup(&history) {
        return ResolutionStatus::NotArrived;
    }

    let Some(form) = record.get("formF22Params").object() else {
        return ResolutionStatus::MissingDetailForm;
    };

    fields.set(FormField::SenderAddress, form.get("senderAddress").string());
    fields.set(
        FormField::MailTypeAndCategory,
        format!(
            "{}, {}",
            form.get("MailTypeText").string(),
            form.get("MailCtgText").string()
        ),
    );
    fields.set(FormField::WithNotification, form.get("postmarkText").string());
    fields.set(
        FormField::StorageDeadline,
        format_storage_date(form.get("endStorageDate").i64()),
    );
    fields.set(FormField::MailRank, form.get("MailRankText").string());
    fields.set(FormField::Weight, format_weight(form.get("WeightGr").i64()));
    fields.set(
        FormField::DeclaredValue,
        format_currency(form.get("SummInsured").f64()),
    );
    fields.set(
        FormField::CashOnDelivery,
        format_currency(form.get("SummCashOnDelivery").f64()),
    );
    fields.set(
        FormField::ReturnFee,
        format_currency(form.get(RETURN_FEE_SOURCE_FIELD_UNVERIFIED).f64()),
    );
    // No known source for the forwarding fee.
    fields.set(FormField::ForwardingFee, "");
    fields.set(
        FormField::CustomsDuty,
        format_currency(form.get("CustomDuty").f64()),
    );

    let Some(office) = record.get("officeSummary").object() else {
        return ResolutionStatus::MissingOfficeInfo;
    };

    let address = office.get("addressSource").string();
    let schedule = office.get("workingSchedule").strings();
    let phones = office.get("phones").strings();

    fields.set(
        FormField::PickupOfficeAddress,
        join_paragraphs(
            std::iter::once(address.as_str())
                .chain(schedule.iter().map(String::as_str))
                .chain(phones.iter().map(String::as_str)),
        ),
    );
    fields.set(
        FormField::CourierCall,
        phones.first().cloned().unwrap_or_default(),
    );

    ResolutionStatus::Complete
}

fn is_ready_for_pickup(history: &[JsonLookup<'_>]) -> bool {
    history.iter().any(|entry| {
        entry.get("operationType").i64() == ARRIVED_OPERATION_TYPE
            && entry.get("operationAttr").i64() == ARRIVED_OPERATION_ATTR
    })
}
