use crate::storage::{ReferralClick, ReferralLink};
use migration::entities::{referral_click, referral_link};

pub fn model_to_link(model: referral_link::Model) -> ReferralLink {
    ReferralLink {
        id: model.id,
        code: model.code,
        active: model.active,
        created_at: model.created_at,
    }
}

pub fn model_to_click(model: referral_click::Model) -> ReferralClick {
    ReferralClick {
        id: model.id,
        referral_id: model.referral_id,
        code: model.code,
        ip: model.ip,
        user_agent: model.user_agent,
        created_at: model.created_at,
    }
}
