use serde::{Deserialize, Serialize};

/// Agreed pairing of a job offer with a resource offer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub job_creator: String,
    pub resource_provider: String,
    pub mediator: Option<String>,
    pub state: u8,
    pub transactions: DealTransactions,
}

/// Hashes of confirmed on-chain transactions, grouped by the role that sent them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealTransactions {
    pub job_creator: DealTransactionsJobCreator,
    pub resource_provider: DealTransactionsResourceProvider,
    pub mediator: DealTransactionsMediator,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealTransactionsJobCreator {
    pub agree: Option<String>,
    pub accept_result: Option<String>,
    pub check_result: Option<String>,
    pub timeout_agree: Option<String>,
    pub timeout_submit_result: Option<String>,
    pub timeout_mediate_result: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealTransactionsResourceProvider {
    pub agree: Option<String>,
    pub add_result: Option<String>,
    pub timeout_agree: Option<String>,
    pub timeout_judge_result: Option<String>,
    pub timeout_mediate_result: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealTransactionsMediator {
    pub mediation_accept_result: Option<String>,
    pub mediation_reject_result: Option<String>,
}
