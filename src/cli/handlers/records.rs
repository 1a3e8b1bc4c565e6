use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CmdResult, Ctx, confirm, print_json, print_lines};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::model::records::*;
use crate::model::session::Session;

async fn list<T>(ctx: &Ctx, session: &Session, kind: RecordKind, fmt: fn(&T) -> String) -> CmdResult
where
    T: DeserializeOwned + Serialize,
{
    let items: Vec<T> = ctx.api.list_records(session, kind).await?;
    if ctx.json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("no {} records", kind.singular());
    }
    for item in &items {
        println!("{}", fmt(item));
    }
    Ok(())
}

pub(super) async fn cmd_records(ctx: &Ctx, args: RecordsArgs) -> CmdResult {
    let session = ctx.session()?;
    match args.kind {
        RecordKind::Companies => list(ctx, &session, args.kind, format_company).await,
        RecordKind::Cases => list(ctx, &session, args.kind, format_case_line).await,
        RecordKind::Owners => list(ctx, &session, args.kind, format_owner).await,
        RecordKind::Properties => list(ctx, &session, args.kind, format_property).await,
        RecordKind::ConstructionTypes => {
            list(ctx, &session, args.kind, format_construction_type).await
        }
    }
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

pub(super) async fn cmd_company(ctx: &Ctx, cmd: CompanyCmd) -> CmdResult {
    match cmd.action {
        CompanyAction::Show { id } => {
            let session = ctx.session()?;
            let company: Company = ctx
                .api
                .fetch_record(&session, RecordKind::Companies, id)
                .await?;
            if ctx.json {
                return print_json(&company);
            }
            print_lines(&format_company_detail(&company));
            Ok(())
        }
        CompanyAction::Add(args) => {
            let name = args.name.trim();
            if name.is_empty() {
                return Err("company name is required".into());
            }
            let draft = CompanyDraft {
                name: name.to_string(),
                address: args.address.filter(|a| !a.trim().is_empty()),
                contact_person_name: args.contact.filter(|c| !c.trim().is_empty()),
            };
            let session = ctx.session()?;
            let company: Company = ctx
                .api
                .create_record(&session, RecordKind::Companies, &draft)
                .await?;
            if ctx.json {
                return print_json(&company);
            }
            println!("created company #{} {}", company.id, company.name);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Cases
// ---------------------------------------------------------------------------

pub(super) async fn cmd_case(ctx: &Ctx, cmd: CaseCmd) -> CmdResult {
    match cmd.action {
        CaseAction::Summary => {
            let session = ctx.session()?;
            let cases: Vec<Case> = ctx.api.list_records(&session, RecordKind::Cases).await?;
            let summary = CaseSummary::count(&cases);
            if ctx.json {
                return print_json(&summary);
            }
            print_lines(&format_case_summary(&summary));
            Ok(())
        }
        CaseAction::Show { id } => {
            let session = ctx.session()?;
            let case = ctx.api.fetch_case(&session, id).await?;
            if ctx.json {
                return print_json(&case);
            }
            print_lines(&format_case_detail(&case));
            Ok(())
        }
        CaseAction::Add(args) => case_add(ctx, args).await,
        CaseAction::Edit(args) => case_edit(ctx, args).await,
        CaseAction::Rm(args) => {
            let session = ctx.session()?;
            if !args.yes && !confirm(&format!("Delete case #{}?", args.id))? {
                println!("cancelled");
                return Ok(());
            }
            ctx.api.delete_case(&session, args.id).await?;
            println!("deleted case #{}", args.id);
            Ok(())
        }
    }
}

async fn case_add(ctx: &Ctx, args: CaseAddArgs) -> CmdResult {
    let draft = CaseDraft {
        case_type: args.case_type,
        status: args.status,
        owner: args.owner,
        property: args.property,
        assigned_sales: args.sales,
        occurence_date: args.date,
        expected_construction_types: args.construction_types,
    };
    let missing = draft.missing_fields();
    if !missing.is_empty() {
        return Err(format!("missing required fields: {}", missing.join(", ")).into());
    }

    let session = ctx.session()?;
    let case: Case = ctx
        .api
        .create_record(&session, RecordKind::Cases, &draft)
        .await?;
    if ctx.json {
        return print_json(&case);
    }
    println!("created case #{}", case.id);
    Ok(())
}

async fn case_edit(ctx: &Ctx, args: CaseEditArgs) -> CmdResult {
    if args.case_type.is_none() && args.status.is_none() {
        return Err("nothing to change (pass --type and/or --status)".into());
    }
    let session = ctx.session()?;
    // The edit endpoint wants both fields; fill the missing one from the server
    let current = ctx.api.fetch_case(&session, args.id).await?;
    let update = CaseUpdate {
        case_type: args.case_type.unwrap_or(current.case_type),
        status: args.status.unwrap_or(current.status),
    };
    if update.case_type.trim().is_empty() || update.status.trim().is_empty() {
        return Err("case type and status must not be blank".into());
    }
    let case = ctx.api.update_case(&session, args.id, &update).await?;
    if ctx.json {
        return print_json(&case);
    }
    println!("saved case #{} [{} / {}]", case.id, case.case_type, case.status);
    Ok(())
}
