// src/services/document_service.rs
//
// Fatura mensal do cliente em PDF. Os números financeiros saem SOMENTE do
// monthly_balances — as vendas entram apenas como linhas de detalhe.

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BalanceRepository, CustomerRepository, MilkTypeRepository, SaleRepository, SettingsRepository},
    models::billing::{BalanceStatus, Period},
};

#[derive(Clone)]
pub struct DocumentService {
    customer_repo: CustomerRepository,
    sale_repo: SaleRepository,
    milk_type_repo: MilkTypeRepository,
    balance_repo: BalanceRepository,
    settings_repo: SettingsRepository,
}

impl DocumentService {
    pub fn new(
        customer_repo: CustomerRepository,
        sale_repo: SaleRepository,
        milk_type_repo: MilkTypeRepository,
        balance_repo: BalanceRepository,
        settings_repo: SettingsRepository,
    ) -> Self {
        Self {
            customer_repo,
            sale_repo,
            milk_type_repo,
            balance_repo,
            settings_repo,
        }
    }

    pub async fn generate_bill_pdf(
        &self,
        user_id: Uuid,
        customer_id: Uuid,
        period: Period,
    ) -> Result<Vec<u8>, AppError> {
        if !period.is_valid() {
            return Err(AppError::InvalidMonth(period.month));
        }

        // 1. Busca os dados
        let customer = self
            .customer_repo
            .find_by_id(user_id, customer_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let settings = self.settings_repo.get_or_create(user_id).await?;

        // O cache é a única fonte financeira da fatura; mês sem movimento
        // sai zerado
        let balance = self.balance_repo.find(customer_id, period).await?;
        let (sales_amount, payment_amount, month_balance, status) = match &balance {
            Some(row) => (row.sales_amount, row.payment_amount, row.balance, row.status),
            None => (
                rust_decimal::Decimal::ZERO,
                rust_decimal::Decimal::ZERO,
                rust_decimal::Decimal::ZERO,
                BalanceStatus::NoSales,
            ),
        };

        let from = period
            .first_day()
            .ok_or(AppError::InvalidMonth(period.month))?;
        let to = period
            .next()
            .first_day()
            .ok_or(AppError::InvalidMonth(period.month))?;
        let sales = self.sale_repo.list_for_period(customer_id, from, to).await?;

        let milk_type_names: HashMap<Uuid, String> = self
            .milk_type_repo
            .list(user_id)
            .await?
            .into_iter()
            .map(|mt| (mt.id, mt.name))
            .collect();

        // 2. Configura o PDF
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Fatura {} - {}", period, customer.name));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        let title_text = settings
            .company_name
            .clone()
            .unwrap_or("LEITERIA".to_string());
        doc.push(
            elements::Paragraph::new(title_text)
                .styled(style::Style::new().bold().with_font_size(18)),
        );

        if let Some(doc_num) = &settings.document_number {
            doc.push(
                elements::Paragraph::new(format!("CNPJ/CPF: {}", doc_num))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }

        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(format!("FATURA MENSAL - {}", period))
                .styled(style::Style::new().bold().with_font_size(14)),
        );

        doc.push(elements::Paragraph::new(format!("Cliente: {}", customer.name)));
        if let Some(addr) = &customer.address {
            doc.push(elements::Paragraph::new(format!("Endereço: {}", addr)));
        }

        doc.push(elements::Break::new(2));

        // --- TABELA DE ENTREGAS ---
        // Pesos das colunas: Data (2), Tipo (3), Litros (1), Tarifa (2), Total (2)
        let mut table = elements::TableLayout::new(vec![2, 3, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Data").styled(style_bold))
            .element(elements::Paragraph::new("Tipo").styled(style_bold))
            .element(elements::Paragraph::new("Litros").styled(style_bold))
            .element(elements::Paragraph::new("Tarifa").styled(style_bold))
            .element(elements::Paragraph::new("Total").styled(style_bold))
            .push()
            .expect("Table error");

        for sale in &sales {
            let type_name = milk_type_names
                .get(&sale.milk_type_id)
                .cloned()
                .unwrap_or("-".to_string());

            table
                .row()
                .element(elements::Paragraph::new(sale.date.format("%d/%m/%Y").to_string()))
                .element(elements::Paragraph::new(type_name))
                .element(elements::Paragraph::new(format!("{:.2}", sale.quantity)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", sale.rate)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", sale.total_amount())))
                .push()
                .expect("Table row error");
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS (do cache mensal) ---
        doc.push(elements::Paragraph::new(format!("Vendas do mês: R$ {:.2}", sales_amount)));
        doc.push(elements::Paragraph::new(format!("Pagamentos: R$ {:.2}", payment_amount)));

        let mut total_paragraph =
            elements::Paragraph::new(format!("SALDO DO MÊS: R$ {:.2}", month_balance));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        let status_label = match status {
            BalanceStatus::NoSales => "Sem entregas no mês",
            BalanceStatus::Paid => "QUITADO",
            BalanceStatus::Pending => "EM ABERTO",
        };
        doc.push(elements::Paragraph::new(format!("Situação: {}", status_label)));

        doc.push(elements::Break::new(2));

        // --- ÁREA DE PAGAMENTO (QR CODE) ---
        if let Some(key) = &settings.pix_key {
            doc.push(
                elements::Paragraph::new("PAGAMENTO VIA PIX")
                    .styled(style::Style::new().bold().with_font_size(12)),
            );

            doc.push(elements::Paragraph::new(format!("Chave: {}", key)));
            doc.push(elements::Break::new(1));

            // QR Code simples da chave; o payload EMV oficial ficaria numa
            // lib de Pix dedicada
            let code = QrCode::new(key.as_bytes())
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

            let image_buffer = code.render::<Luma<u8>>().build();
            let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

            let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
                .with_scale(genpdf::Scale::new(0.5, 0.5));

            doc.push(pdf_image);
        }

        // --- RODAPÉ ---
        if let Some(note) = &settings.footer_note {
            doc.push(elements::Break::new(2));
            doc.push(
                elements::Paragraph::new(note.clone())
                    .styled(style::Style::new().italic().with_font_size(8)),
            );
        }

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
