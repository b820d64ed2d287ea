use std::convert::TryFrom;

use solver_model::{
    Deal, DealResult, DealTransactions, DealTransactionsJobCreator, DealTransactionsMediator,
    DealTransactionsResourceProvider, JobOffer, MatchDecision, ResourceOffer,
};

use crate::db::schema::{
    solver_deal, solver_job_offer, solver_match_decision, solver_resource_offer, solver_result,
};
use crate::error::{ConversionError, EntityKind};

fn state_code(kind: EntityKind, id: &str, code: i32) -> Result<u8, ConversionError> {
    u8::try_from(code).map_err(|_| ConversionError {
        kind,
        id: id.to_string(),
        code,
    })
}

#[derive(Clone, Debug, Insertable, Queryable)]
#[table_name = "solver_job_offer"]
pub struct DbJobOffer {
    pub id: String,
    pub job_creator: String,
    pub deal_id: Option<String>,
    pub state: i32,
}

impl From<JobOffer> for DbJobOffer {
    fn from(offer: JobOffer) -> Self {
        DbJobOffer {
            id: offer.id,
            job_creator: offer.job_creator,
            deal_id: offer.deal_id,
            state: offer.state as i32,
        }
    }
}

impl TryFrom<DbJobOffer> for JobOffer {
    type Error = ConversionError;

    fn try_from(offer: DbJobOffer) -> Result<Self, Self::Error> {
        Ok(JobOffer {
            state: state_code(EntityKind::JobOffer, &offer.id, offer.state)?,
            id: offer.id,
            job_creator: offer.job_creator,
            deal_id: offer.deal_id,
        })
    }
}

#[derive(Clone, Debug, Queryable)]
pub struct DbResourceOffer {
    /// Insertion order, assigned by the database.
    pub seq: i32,
    pub id: String,
    pub resource_provider: String,
    pub deal_id: Option<String>,
    pub state: i32,
}

#[derive(Clone, Debug, Insertable)]
#[table_name = "solver_resource_offer"]
pub struct NewDbResourceOffer {
    pub id: String,
    pub resource_provider: String,
    pub deal_id: Option<String>,
    pub state: i32,
}

impl From<ResourceOffer> for NewDbResourceOffer {
    fn from(offer: ResourceOffer) -> Self {
        NewDbResourceOffer {
            id: offer.id,
            resource_provider: offer.resource_provider,
            deal_id: offer.deal_id,
            state: offer.state as i32,
        }
    }
}

impl TryFrom<DbResourceOffer> for ResourceOffer {
    type Error = ConversionError;

    fn try_from(offer: DbResourceOffer) -> Result<Self, Self::Error> {
        Ok(ResourceOffer {
            state: state_code(EntityKind::ResourceOffer, &offer.id, offer.state)?,
            id: offer.id,
            resource_provider: offer.resource_provider,
            deal_id: offer.deal_id,
        })
    }
}

/// Deal row with the transaction record flattened into per-role columns.
#[derive(Clone, Debug, Insertable, Queryable)]
#[table_name = "solver_deal"]
pub struct DbDeal {
    pub id: String,
    pub job_creator: String,
    pub resource_provider: String,
    pub mediator: Option<String>,
    pub state: i32,

    pub jc_agree: Option<String>,
    pub jc_accept_result: Option<String>,
    pub jc_check_result: Option<String>,
    pub jc_timeout_agree: Option<String>,
    pub jc_timeout_submit_result: Option<String>,
    pub jc_timeout_mediate_result: Option<String>,

    pub rp_agree: Option<String>,
    pub rp_add_result: Option<String>,
    pub rp_timeout_agree: Option<String>,
    pub rp_timeout_judge_result: Option<String>,
    pub rp_timeout_mediate_result: Option<String>,

    pub m_mediation_accept_result: Option<String>,
    pub m_mediation_reject_result: Option<String>,
}

impl From<Deal> for DbDeal {
    fn from(deal: Deal) -> Self {
        let DealTransactions {
            job_creator: jc,
            resource_provider: rp,
            mediator: m,
        } = deal.transactions;

        DbDeal {
            id: deal.id,
            job_creator: deal.job_creator,
            resource_provider: deal.resource_provider,
            mediator: deal.mediator,
            state: deal.state as i32,

            jc_agree: jc.agree,
            jc_accept_result: jc.accept_result,
            jc_check_result: jc.check_result,
            jc_timeout_agree: jc.timeout_agree,
            jc_timeout_submit_result: jc.timeout_submit_result,
            jc_timeout_mediate_result: jc.timeout_mediate_result,

            rp_agree: rp.agree,
            rp_add_result: rp.add_result,
            rp_timeout_agree: rp.timeout_agree,
            rp_timeout_judge_result: rp.timeout_judge_result,
            rp_timeout_mediate_result: rp.timeout_mediate_result,

            m_mediation_accept_result: m.mediation_accept_result,
            m_mediation_reject_result: m.mediation_reject_result,
        }
    }
}

impl TryFrom<DbDeal> for Deal {
    type Error = ConversionError;

    fn try_from(deal: DbDeal) -> Result<Self, Self::Error> {
        Ok(Deal {
            state: state_code(EntityKind::Deal, &deal.id, deal.state)?,
            id: deal.id,
            job_creator: deal.job_creator,
            resource_provider: deal.resource_provider,
            mediator: deal.mediator,
            transactions: DealTransactions {
                job_creator: DealTransactionsJobCreator {
                    agree: deal.jc_agree,
                    accept_result: deal.jc_accept_result,
                    check_result: deal.jc_check_result,
                    timeout_agree: deal.jc_timeout_agree,
                    timeout_submit_result: deal.jc_timeout_submit_result,
                    timeout_mediate_result: deal.jc_timeout_mediate_result,
                },
                resource_provider: DealTransactionsResourceProvider {
                    agree: deal.rp_agree,
                    add_result: deal.rp_add_result,
                    timeout_agree: deal.rp_timeout_agree,
                    timeout_judge_result: deal.rp_timeout_judge_result,
                    timeout_mediate_result: deal.rp_timeout_mediate_result,
                },
                mediator: DealTransactionsMediator {
                    mediation_accept_result: deal.m_mediation_accept_result,
                    mediation_reject_result: deal.m_mediation_reject_result,
                },
            },
        })
    }
}

#[derive(Clone, Debug, Insertable, Queryable)]
#[table_name = "solver_result"]
pub struct DbDealResult {
    pub deal_id: String,
    pub id: String,
}

impl From<DealResult> for DbDealResult {
    fn from(result: DealResult) -> Self {
        DbDealResult {
            deal_id: result.deal_id,
            id: result.id,
        }
    }
}

impl From<DbDealResult> for DealResult {
    fn from(result: DbDealResult) -> Self {
        DealResult {
            deal_id: result.deal_id,
            id: result.id,
        }
    }
}

#[derive(Clone, Debug, Insertable, Queryable)]
#[table_name = "solver_match_decision"]
pub struct DbMatchDecision {
    pub match_id: String,
    pub resource_offer_id: String,
    pub job_offer_id: String,
    pub deal_id: String,
    pub result: bool,
}

impl From<MatchDecision> for DbMatchDecision {
    fn from(decision: MatchDecision) -> Self {
        DbMatchDecision {
            match_id: decision.match_id().to_string(),
            resource_offer_id: decision.resource_offer,
            job_offer_id: decision.job_offer,
            deal_id: decision.deal,
            result: decision.result,
        }
    }
}

impl From<DbMatchDecision> for MatchDecision {
    fn from(decision: DbMatchDecision) -> Self {
        MatchDecision {
            resource_offer: decision.resource_offer_id,
            job_offer: decision.job_offer_id,
            deal: decision.deal_id,
            result: decision.result,
        }
    }
}
