table! {
    solver_job_offer (id) {
        id -> Text,
        job_creator -> Text,
        deal_id -> Nullable<Text>,
        state -> Integer,
    }
}

table! {
    solver_resource_offer (seq) {
        seq -> Integer,
        id -> Text,
        resource_provider -> Text,
        deal_id -> Nullable<Text>,
        state -> Integer,
    }
}

table! {
    solver_deal (id) {
        id -> Text,
        job_creator -> Text,
        resource_provider -> Text,
        mediator -> Nullable<Text>,
        state -> Integer,

        jc_agree -> Nullable<Text>,
        jc_accept_result -> Nullable<Text>,
        jc_check_result -> Nullable<Text>,
        jc_timeout_agree -> Nullable<Text>,
        jc_timeout_submit_result -> Nullable<Text>,
        jc_timeout_mediate_result -> Nullable<Text>,

        rp_agree -> Nullable<Text>,
        rp_add_result -> Nullable<Text>,
        rp_timeout_agree -> Nullable<Text>,
        rp_timeout_judge_result -> Nullable<Text>,
        rp_timeout_mediate_result -> Nullable<Text>,

        m_mediation_accept_result -> Nullable<Text>,
        m_mediation_reject_result -> Nullable<Text>,
    }
}

table! {
    solver_result (deal_id) {
        deal_id -> Text,
        id -> Text,
    }
}

table! {
    solver_match_decision (match_id) {
        match_id -> Text,
        resource_offer_id -> Text,
        job_offer_id -> Text,
        deal_id -> Text,
        result -> Bool,
    }
}

allow_tables_to_appear_in_same_query!(
    solver_job_offer,
    solver_resource_offer,
    solver_deal,
    solver_result,
    solver_match_decision,
);
