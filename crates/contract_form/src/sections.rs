//! Contract form sections and layout
//!
//! Every section is a unit struct holding its expanders as static tables.
//! [`render_form`] walks the fixed layout and collects one value per field.

use crate::field::FieldDef;
use crate::mapping::FieldMapping;
use crate::surface::FormSurface;

/// A collapsible block of inputs; groups are separated by dividers
#[derive(Debug, Clone, Copy)]
pub struct Expander {
    pub title: &'static str,
    pub expanded: bool,
    pub groups: &'static [&'static [FieldDef]],
}

impl Expander {
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        let groups = self.groups;
        groups.iter().flat_map(|group| group.iter())
    }
}

/// A part of the form that renders its inputs into a surface
pub trait FormSection {
    /// Short section name
    fn name(&self) -> &'static str;

    fn expanders(&self) -> &'static [Expander];

    /// Render every expander and store each answer in `mapping`
    fn render(&self, surface: &mut dyn FormSurface, mapping: &mut FieldMapping) {
        for expander in self.expanders() {
            surface.expander(expander.title, expander.expanded);
            for (index, group) in expander.groups.iter().enumerate() {
                if index > 0 {
                    surface.divider();
                }
                for field in group.iter() {
                    let value = surface.text_input(field);
                    mapping.insert(field.key, value);
                }
            }
        }
    }

    fn fields(&self) -> Vec<&'static FieldDef> {
        self.expanders().iter().flat_map(Expander::fields).collect()
    }
}

const fn field(key: &'static str, label: &'static str, default: &'static str) -> FieldDef {
    FieldDef::new(key, label, default)
}

const SELLER_1: &[FieldDef] = &[
    field("vendedor_1_nome", "Nome do Vendedor 1", "JOSÉ"),
    field("vendedor_1_nacionalidade", "Nacionalidade do Vendedor 1", "brasileiro"),
    field("vendedor_1_estado_civil", "Estado Civil do Vendedor 1", "convivente"),
    field("vendedor_1_profissao", "Profissão do Vendedor 1", "motorista"),
    field("vendedor_1_rg", "RG do Vendedor 1", "X.XXX.XXX-X"),
    field("vendedor_1_cpf", "CPF do Vendedor 1", "XXX.XXX.XXX-XX"),
    field("vendedor_1_endereco", "Endereço do Vendedor 1", "Rua Da Esperança, 1. Maringá/PR"),
];

const SELLER_2: &[FieldDef] = &[
    field("vendedor_2_nome", "Nome da Vendedora 2", "SOLANGE"),
    field("vendedor_2_nacionalidade", "Nacionalidade da Vendedora 2", "brasileira"),
    field("vendedor_2_estado_civil", "Estado Civil da Vendedora 2", "convivente"),
    field("vendedor_2_profissao", "Profissão da Vendedora 2", "do lar"),
    field("vendedor_2_rg", "RG da Vendedora 2", "X.XXX.XXX-X"),
    field("vendedor_2_cpf", "CPF da Vendedora 2", "XXX.XXX.XXX-XX"),
    field("vendedor_2_endereco", "Endereço da Vendedora 2", "Rua Do Amor, 1. Maringá/PR"),
];

const BUYER: &[FieldDef] = &[
    field("comprador_nome", "Nome do Comprador", "JOÃO"),
    field("comprador_nacionalidade", "Nacionalidade do Comprador", "brasileiro"),
    field("comprador_profissao", "Profissão do Comprador", "auxiliar de escritório"),
    field("comprador_rg", "RG do Comprador", "X.XXX.XXX-X"),
    field("comprador_cpf", "CPF do Comprador", "XXX.XXX.XXX-XX"),
    field("comprador_endereco", "Endereço do Comprador", "Rua Do Sucesso, 1. Maringá/PR"),
];

const ATTORNEY: &[FieldDef] = &[
    field("procurador_nome", "Nome da Procuradora", "MARIA"),
    field("procurador_nacionalidade", "Nacionalidade da Procuradora", "brasileira"),
    field("procurador_estado_civil", "Estado Civil da Procuradora", "casada"),
    field("procurador_profissao", "Profissão da Procuradora", "do lar"),
    field("procurador_rg", "RG da Procuradora", "X.XXX.XXX-X"),
    field("procurador_cpf", "CPF da Procuradora", "XXX.XXX.XXX-XX"),
    field("procurador_endereco", "Endereço da Procuradora", "Rua Do Sucesso, 1. Maringá/PR"),
];

const PROPERTY: &[FieldDef] = &[
    field(
        "imovel_descricao",
        "Descrição do Imóvel",
        "casa \"2\" (dois) do CONDOMINIO RESIDENCIAL CLARO E PIMENTEL",
    ),
    field("imovel_area_privativa", "Área Privativa (m²)", "99,95"),
    field("imovel_area_terreno", "Fração Ideal do Terreno (m²)", "150,15"),
    field("imovel_endereco", "Endereço do Imóvel", "Rua Do Sucesso, 2. Maringá/PR"),
    field("imovel_matricula", "Matrícula do Imóvel", "12.345"),
    field(
        "imovel_serventia_registral",
        "Serventia Registral",
        "3ª. Serventia Registral da Comarca de Maringá/PR",
    ),
];

const FINANCING: &[FieldDef] = &[
    field("imovel_banco_financiamento", "Banco do Financiamento", "Caixa Econômica Federal"),
    field("imovel_prazo_financiamento_meses", "Prazo do Financiamento (meses)", "420"),
    field("imovel_prazo_financiamento_extenso", "Prazo por Extenso", "quatrocentos e vinte meses"),
    field("imovel_parcelas_vencidas", "Nº de Parcelas Vencidas", "21"),
    field("imovel_parcelas_vencidas_extenso", "Nº Parcelas Vencidas por Extenso", "vinte e uma"),
    field("imovel_mes_base_vencimento", "Mês Base das Parcelas Vencidas", "maio de 2016"),
];

const PAYMENT_TOTAL: &[FieldDef] = &[
    field("pagamento_valor_total_direitos", "Valor Total dos Direitos (R$)", "40.000,00"),
    field("pagamento_valor_total_direitos_extenso", "Valor Total por Extenso", "quarenta mil reais"),
];

const PAYMENT_INSTALLMENT_1: &[FieldDef] = &[
    field("pagamento_parcela_1_valor", "Valor Parcela 1 (R$)", "15.000,00"),
    field("pagamento_parcela_1_extenso", "Parcela 1 por Extenso", "quinze mil reais"),
    field("pagamento_parcela_1_data", "Data Parcela 1", "06/05/2000"),
    field("pagamento_parcela_1_banco", "Banco Parcela 1", "CEF"),
    field("pagamento_parcela_1_agencia", "Agência", "XXXX"),
    field("pagamento_parcela_1_operacao", "Operação", "XXX"),
    field("pagamento_parcela_1_conta", "Conta/Poupança", "XXXX-X"),
    field("pagamento_parcela_1_favorecido", "Favorecido Parcela 1", "José"),
];

const PAYMENT_INSTALLMENT_2: &[FieldDef] = &[
    field("pagamento_parcela_2_valor", "Valor Parcela 2 - Comissão (R$)", "3.000,00"),
    field("pagamento_parcela_2_extenso", "Parcela 2 por Extenso", "três mil reais"),
    field("pagamento_parcela_2_favorecido", "Favorecido Parcela 2", "Richard"),
];

const PAYMENT_INSTALLMENT_3: &[FieldDef] = &[
    field("pagamento_parcela_3_valor", "Valor Parcela 3 - Vencimento (R$)", "2.000,00"),
    field("pagamento_parcela_3_extenso", "Parcela 3 por Extenso", "dois mil reais"),
    field("pagamento_parcela_3_vencimento", "Mês de Vencimento Parcela 3", "maio"),
];

const PAYMENT_INSTALLMENT_4: &[FieldDef] = &[
    field("pagamento_parcela_4_valor", "Valor Parcela 4 - Final (R$)", "20.000,00"),
    field("pagamento_parcela_4_extenso", "Parcela 4 por Extenso", "vinte mil reais"),
    field("pagamento_parcela_4_data", "Data Parcela 4", "31/12/2000"),
];

const RESPONSIBILITIES: &[FieldDef] = &[
    field("iptu_responsabilidade_vendedor_ate", "Vendedor paga IPTU até", "dezembro de 2000"),
    field("iptu_data_desocupacao", "Data de Desocupação", "dezembro de 2000"),
    field(
        "iptu_responsabilidade_comprador_desde",
        "Comprador paga IPTU a partir de",
        "janeiro de 2001",
    ),
    field(
        "financiamento_responsabilidade_comprador_desde",
        "Comprador paga financiamento a partir de",
        "junho de 2000",
    ),
    field("financiamento_procurador_cartao", "Procurador(a) com cartão do débito", "RICHARD"),
    field("financiamento_agencia_debito", "Agência para Débito", "XXX"),
    field("financiamento_operacao_debito", "Operação para Débito", "XXX"),
    field("financiamento_conta_debito", "Conta para Débito", "XXXX-X"),
    field("financiamento_procurador_venda", "Procurador(a) para venda futura", "RICHARD"),
];

const WITNESS_1: &[FieldDef] = &[
    field("testemunha_1_nome", "Nome da Testemunha 1", "VICTOR"),
    field("testemunha_1_cpf", "CPF da Testemunha 1", "XXX.XXX.XXX-XX"),
];

const WITNESS_2: &[FieldDef] = &[
    field("testemunha_2_nome", "Nome da Testemunha 2", "SOFIA"),
    field("testemunha_2_cpf", "CPF da Testemunha 2", "XXX.XXX.XXX-XX"),
];

const GENERAL_DATA: &[FieldDef] = &[
    field("numero_registro", "Número de Registro", "XXXXX"),
    field("cidade_contrato", "Cidade de Assinatura", "Maringá"),
    field("uf_contrato", "UF de Assinatura", "PR"),
    field("estado_contrato", "Estado por Extenso", "Paraná"),
    field("data_assinatura", "Data de Assinatura", "06 de maio de 2000"),
];

/// Vendedor 1 and Vendedora 2
pub struct SellerSection;

impl FormSection for SellerSection {
    fn name(&self) -> &'static str {
        "Vendedor"
    }

    fn expanders(&self) -> &'static [Expander] {
        &[
            Expander {
                title: "Dados do Vendedor 1",
                expanded: true,
                groups: &[SELLER_1],
            },
            Expander {
                title: "Dados da Vendedora 2",
                expanded: true,
                groups: &[SELLER_2],
            },
        ]
    }
}

/// Comprador and the buyer's attorney
pub struct BuyerSection;

impl FormSection for BuyerSection {
    fn name(&self) -> &'static str {
        "Comprador"
    }

    fn expanders(&self) -> &'static [Expander] {
        &[
            Expander {
                title: "Dados do Comprador",
                expanded: true,
                groups: &[BUYER],
            },
            Expander {
                title: "Dados da Procuradora do Comprador",
                expanded: false,
                groups: &[ATTORNEY],
            },
        ]
    }
}

pub struct PropertySection;

impl FormSection for PropertySection {
    fn name(&self) -> &'static str {
        "Imóvel"
    }

    fn expanders(&self) -> &'static [Expander] {
        &[Expander {
            title: "Detalhes do Imóvel",
            expanded: true,
            groups: &[PROPERTY],
        }]
    }
}

pub struct FinancingSection;

impl FormSection for FinancingSection {
    fn name(&self) -> &'static str {
        "Financiamento"
    }

    fn expanders(&self) -> &'static [Expander] {
        &[Expander {
            title: "Detalhes do Financiamento",
            expanded: true,
            groups: &[FINANCING],
        }]
    }
}

/// Totals followed by the four installments
pub struct PaymentSection;

impl FormSection for PaymentSection {
    fn name(&self) -> &'static str {
        "Pagamento"
    }

    fn expanders(&self) -> &'static [Expander] {
        &[Expander {
            title: "Valores e Forma de Pagamento",
            expanded: true,
            groups: &[
                PAYMENT_TOTAL,
                PAYMENT_INSTALLMENT_1,
                PAYMENT_INSTALLMENT_2,
                PAYMENT_INSTALLMENT_3,
                PAYMENT_INSTALLMENT_4,
            ],
        }]
    }
}

/// IPTU and financing responsibilities
pub struct ResponsibilitiesSection;

impl FormSection for ResponsibilitiesSection {
    fn name(&self) -> &'static str {
        "Responsabilidades"
    }

    fn expanders(&self) -> &'static [Expander] {
        &[Expander {
            title: "Responsabilidades (IPTU e Financiamento)",
            expanded: true,
            groups: &[RESPONSIBILITIES],
        }]
    }
}

pub struct WitnessesSection;

impl FormSection for WitnessesSection {
    fn name(&self) -> &'static str {
        "Testemunhas"
    }

    fn expanders(&self) -> &'static [Expander] {
        &[Expander {
            title: "Testemunhas",
            expanded: true,
            groups: &[WITNESS_1, WITNESS_2],
        }]
    }
}

/// Registration number, place and date of signature
pub struct GeneralDataSection;

impl FormSection for GeneralDataSection {
    fn name(&self) -> &'static str {
        "Dados Gerais"
    }

    fn expanders(&self) -> &'static [Expander] {
        &[Expander {
            title: "Dados Gerais do Contrato",
            expanded: true,
            groups: &[GENERAL_DATA],
        }]
    }
}

/// Where a run of sections appears on the page
pub struct Placement {
    pub heading: Option<&'static str>,
    pub column: usize,
    pub sections: &'static [&'static dyn FormSection],
}

/// Page layout, in rendering order
pub const LAYOUT: &[Placement] = &[
    Placement {
        heading: Some("Partes Envolvidas"),
        column: 0,
        sections: &[&SellerSection, &BuyerSection],
    },
    Placement {
        heading: Some("Dados do Imóvel e Contrato"),
        column: 1,
        sections: &[&PropertySection, &FinancingSection, &PaymentSection],
    },
    Placement {
        heading: Some("Cláusulas Adicionais e Assinaturas"),
        column: 0,
        sections: &[&ResponsibilitiesSection],
    },
    Placement {
        heading: None,
        column: 1,
        sections: &[&WitnessesSection, &GeneralDataSection],
    },
];

/// Every section, in rendering order
pub fn sections() -> Vec<&'static dyn FormSection> {
    LAYOUT
        .iter()
        .flat_map(|placement| placement.sections.iter().copied())
        .collect()
}

/// Every field, in rendering order
pub fn catalog() -> Vec<&'static FieldDef> {
    sections().into_iter().flat_map(|section| section.fields()).collect()
}

/// Look up a field by key
pub fn find_field(key: &str) -> Option<&'static FieldDef> {
    catalog().into_iter().find(|field| field.key == key)
}

/// Render the whole form into `surface` and return the collected values
pub fn render_form(surface: &mut dyn FormSurface) -> FieldMapping {
    let mut mapping = FieldMapping::new();

    for placement in LAYOUT {
        if let Some(heading) = placement.heading {
            surface.heading(heading);
        }
        surface.column(placement.column);
        for section in placement.sections {
            section.render(surface, &mut mapping);
        }
    }

    tracing::debug!(fields = mapping.len(), "Rendered contract form");
    mapping
}
