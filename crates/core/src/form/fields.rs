//! Template field names and the field value map.

use std::collections::BTreeMap;
use std::fmt;

/// A token that can appear in the notice template.
///
/// Each variant maps to the key used inside the template's `${...}` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    GenerationDate,
    TrackingCode,
    RecipientName,
    RecipientAddress,
    MailTypeAndCategory,
    MailRank,
    WithNotification,
    StorageDeadline,
    SenderAddress,
    Weight,
    DeclaredValue,
    CashOnDelivery,
    ReturnFee,
    ForwardingFee,
    CustomsDuty,
    PickupOfficeAddress,
    CourierCall,
    IdType,
    IdSeries,
    IdNumber,
    IdIssueDay,
    IdIssueMonth,
    IdIssueYear,
    IdIssuedBy,
    RegistrationAddress,
    PickupDay,
    PickupMonth,
    PickupYear,
}

impl FormField {
    /// Every field that appears in the template.
    pub const ALL: [FormField; 28] = [
        FormField::GenerationDate,
        FormField::TrackingCode,
        FormField::RecipientName,
        FormField::RecipientAddress,
        FormField::MailTypeAndCategory,
        FormField::MailRank,
        FormField::WithNotification,
        FormField::StorageDeadline,
        FormField::SenderAddress,
        FormField::Weight,
        FormField::DeclaredValue,
        FormField::CashOnDelivery,
        FormField::ReturnFee,
        FormField::ForwardingFee,
        FormField::CustomsDuty,
        FormField::PickupOfficeAddress,
        FormField::CourierCall,
        FormField::IdType,
        FormField::IdSeries,
        FormField::IdNumber,
        FormField::IdIssueDay,
        FormField::IdIssueMonth,
        FormField::IdIssueYear,
        FormField::IdIssuedBy,
        FormField::RegistrationAddress,
        FormField::PickupDay,
        FormField::PickupMonth,
        FormField::PickupYear,
    ];

    /// Fields filled from the remote tracking service.
    pub const REMOTE: [FormField; 13] = [
        FormField::SenderAddress,
        FormField::MailTypeAndCategory,
        FormField::WithNotification,
        FormField::StorageDeadline,
        FormField::MailRank,
        FormField::Weight,
        FormField::DeclaredValue,
        FormField::CashOnDelivery,
        FormField::ReturnFee,
        FormField::ForwardingFee,
        FormField::CustomsDuty,
        FormField::PickupOfficeAddress,
        FormField::CourierCall,
    ];

    /// The key as written inside the template token.
    pub fn key(&self) -> &'static str {
        match self {
            FormField::GenerationDate => "Дата.Генерация",
            FormField::TrackingCode => "Код отслеживания",
            FormField::RecipientName => "Получатель.Имя",
            FormField::RecipientAddress => "Получатель.Адрес.Указанный",
            FormField::MailTypeAndCategory => "Вид и категория",
            FormField::MailRank => "Разряд",
            FormField::WithNotification => "С уведомлением",
            FormField::StorageDeadline => "Срок хранения",
            FormField::SenderAddress => "Откуда",
            FormField::Weight => "Масса",
            FormField::DeclaredValue => "Объявленная ценность",
            FormField::CashOnDelivery => "Наложенный платеж",
            FormField::ReturnFee => "Плата за возврат",
            FormField::ForwardingFee => "Плата за досыл",
            FormField::CustomsDuty => "Таможенная пошлина",
            FormField::PickupOfficeAddress => "Получатель.Адрес.Выдача",
            FormField::CourierCall => "Вызов курьера",
            FormField::IdType => "Документ.Вид",
            FormField::IdSeries => "Документ.Серия",
            FormField::IdNumber => "Документ.Номер",
            FormField::IdIssueDay => "Документ.Выдан.День",
            FormField::IdIssueMonth => "Документ.Выдан.Месяц",
            FormField::IdIssueYear => "Документ.Выдан.Год",
            FormField::IdIssuedBy => "Документ.Выдан.Кем",
            FormField::RegistrationAddress => "Получатель.Адрес.Регистрация",
            FormField::PickupDay => "Дата.Получение.День",
            FormField::PickupMonth => "Дата.Получение.Месяц",
            FormField::PickupYear => "Дата.Получение.Год",
        }
    }

    /// The full `${key}` token.
    pub fn token(&self) -> String {
        format!("${{{}}}", self.key())
    }

    /// Look a field up by its template key.
    pub fn from_key(key: &str) -> Option<FormField> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Whether the remote tracking service provides this field.
    pub fn is_remote(&self) -> bool {
        Self::REMOTE.contains(self)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Values for a declared set of form fields.
///
/// Every declared field is present from construction on, holding an empty
/// string until something overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFieldMap {
    values: BTreeMap<FormField, String>,
}

impl FormFieldMap {
    /// A map declaring `fields`, all empty.
    pub fn with_fields(fields: &[FormField]) -> Self {
        Self {
            values: fields.iter().map(|f| (*f, String::new())).collect(),
        }
    }

    /// A map over every template field.
    pub fn template() -> Self {
        Self::with_fields(&FormField::ALL)
    }

    /// A map over the remotely resolved fields.
    pub fn remote() -> Self {
        Self::with_fields(&FormField::REMOTE)
    }

    /// Value of `field`, or an empty string when it is not declared.
    pub fn get(&self, field: FormField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Remove `field` from the map, returning its value.
    pub fn take(&mut self, field: FormField) -> Option<String> {
        self.values.remove(&field)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.values.contains_key(&field)
    }

    /// Copy every entry of `other` into this map.
    pub fn overlay(&mut self, other: &FormFieldMap) {
        for (field, value) in &other.values {
            self.values.insert(*field, value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.values.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every declared value is an empty string.
    pub fn is_blank(&self) -> bool {
        self.values.values().all(String::is_empty)
    }
}
