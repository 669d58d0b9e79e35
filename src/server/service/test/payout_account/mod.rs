use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;
use test_utils::{builder::TestBuilder, factory};
use tokio::sync::Barrier;

use super::{bank_information, count_kind, create_params, outbox_kinds};
use crate::server::{
    error::AppError,
    model::{
        audit::{AuditContext, PAYOUT_ACCOUNT_ENTITY},
        outbox::{
            BANK_DETAILS_UPDATE_KIND, EMAIL_KIND, PUSH_KIND, SMS_KIND, STAKEHOLDER_CREATE_KIND,
            WHATSAPP_KIND,
        },
        payout_account::{
            ActivationStatus, BankDetailsStatus, BusinessType, StakeholderData,
            UpdateBankDetailsParams,
        },
    },
    provider::mock::{MockPaymentProvider, MOCK_ACCOUNT_ID, MOCK_PRODUCT_ID},
    service::{audit::AuditService, payout_account::PayoutAccountService},
    util::requirements::Requirement,
};

mod bank_details;
mod create;
mod list_paginated;
mod sync;
