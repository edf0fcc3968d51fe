//! The fixed lead magnet content.
//!
//! Everything the document says lives here, carried over from the marketing
//! template: the cover, the warning section, the four product cards, the
//! results table, the price box, the membership pitch and the closing calls
//! to action.  Copy with inline styling is authored in the markup mini-syntax
//! and parsed into spans; one-off styled lines are built from spans directly.

use genpdf::elements::{LinearLayout, Paragraph};
use genpdf::error::{Error, ErrorKind};
use genpdf::Alignment;

use crate::assets::GuideImages;
use crate::builder::PdfBuilder;
use crate::markup::{parse_markup, Span};
use crate::model::{
    Block, BulletList, CallToAction, Callout, CalloutTone, Cover, CtaAccent, HorizontalAlignment,
    ImageBlock, ImageSource, PriceBox, ProductCard, ResultsTable, RichParagraph, Section,
};
use crate::palette;

/// Document title recorded in the PDF metadata.
pub const GUIDE_TITLE: &str = "Детокс без мучений";

const COVER_IMAGE_WIDTH_MM: f64 = 150.0;
const PRODUCT_IMAGE_WIDTH_MM: f64 = 80.0;

const FOOTER_HEIGHT_MM: f64 = 14.0;
const FOOTER_LINES: [&str; 2] = [
    "© 2025 | Продукция сертифицирована. Не является лекарственным средством.",
    "Биологически активная добавка. Перед применением проконсультируйтесь со специалистом.",
];

/// Assembles the complete lead magnet from the loaded images.
pub fn leadmagnet(images: GuideImages) -> Result<PdfBuilder, Error> {
    let builder = PdfBuilder::new()
        .with_title(GUIDE_TITLE)
        .with_cover(cover(images.cover))
        .add_section(warning_section()?)
        .add_section(solution_section(
            images.coral_mine,
            images.h500,
            images.assimilator,
            images.lecithin,
        )?)
        .add_section(results_section())
        .add_section(pricing_section()?)
        .add_section(membership_section()?)
        .add_section(action_section())
        .with_footer(FOOTER_HEIGHT_MM, footer_element);
    Ok(builder)
}

fn rich(markup: &str) -> Result<RichParagraph, Error> {
    let spans = parse_markup(markup).map_err(|err| {
        Error::new(
            format!("Invalid guide markup: {}", err),
            ErrorKind::InvalidData,
        )
    })?;
    Ok(RichParagraph::new(spans))
}

fn footer_element(_page: usize) -> LinearLayout {
    let mut layout = LinearLayout::vertical();
    for line in FOOTER_LINES {
        let mut paragraph = Paragraph::default();
        paragraph.push(
            Span::new(line)
                .sized(8)
                .colored(palette::MUTED_GRAY)
                .to_styled_string(),
        );
        paragraph.set_alignment(Alignment::Center);
        layout.push(paragraph);
    }
    layout
}

fn cover(cover_bytes: Vec<u8>) -> Cover {
    Cover::new(
        "ДЕТОКС БЕЗ МУЧЕНИЙ",
        "Научный подход к очищению организма",
        ImageBlock::new(ImageSource::from_bytes(cover_bytes))
            .with_alignment(HorizontalAlignment::Center)
            .with_width_mm(Some(COVER_IMAGE_WIDTH_MM)),
    )
}

fn warning_section() -> Result<Section, Error> {
    let alert = Callout::new(CalloutTone::Warning)
        .with_title(RichParagraph::new(vec![Span::new(
            "Прямо сейчас в твоём теле:",
        )
        .bold()
        .sized(13)
        .colored(palette::ALERT_RED)]))
        .with_paragraph(rich(
            "**2-5 кг токсинов и шлаков** — накопленных за годы жизни в городе",
        )?)
        .with_paragraph(rich(
            "**До 15 кг каловых камней** — в кишечнике (да, это не шутка)",
        )?)
        .with_paragraph(rich(
            "**Тысячи микроорганизмов** — которые отравляют тебя изнутри",
        )?);

    let symptoms = BulletList::new()
        .with_item(rich("**Просыпаешься уставшим**, хотя спал 8 часов")?)
        .with_item(rich(
            "**Вздутие после каждого приёма пищи**, даже от \"правильной еды\"",
        )?)
        .with_item(rich(
            "**Прыщи, тусклая кожа, отёки** — косметологи разводят руками",
        )?)
        .with_item(rich("**Туман в голове**, сложно сосредоточиться")?)
        .with_item(rich(
            "**Лишние килограммы не уходят**, хотя сидишь на диетах",
        )?)
        .with_item(rich("**Постоянно болеешь** — иммунитет на нуле")?);

    let closer = RichParagraph::new(vec![Span::new(
        "Врачи говорят \"всё нормально\", но ты ЧУВСТВУЕШЬ что это не так.",
    )
    .bold()
    .colored(palette::ALERT_RED)])
    .centered()
    .with_size(14);

    Ok(Section::new("ВНИМАНИЕ: Это касается ТЕБЯ")
        .with_identifier(Some("warning".to_string()))
        .with_block(Block::Callout(alert))
        .with_block(Block::subheading("Узнаёшь себя?"))
        .with_block(Block::Bullets(symptoms))
        .with_block(Block::Paragraph(closer)))
}

fn solution_section(
    coral_mine_bytes: Vec<u8>,
    h500_bytes: Vec<u8>,
    assimilator_bytes: Vec<u8>,
    lecithin_bytes: Vec<u8>,
) -> Result<Section, Error> {
    Ok(Section::new("Решение существует")
        .with_identifier(Some("solution".to_string()))
        .with_block(Block::subheading(
            "CORAL DETOX — система очищения на клеточном уровне",
        ))
        .with_block(Block::Paragraph(
            rich("**4 продукта. 30 дней. Результат с первой недели.**")?
                .centered()
                .with_size(14),
        ))
        .with_block(Block::Paragraph(rich(
            "Разработано в Японии. 30+ лет исследований. Миллионы довольных клиентов в 40 странах.",
        )?))
        .with_block(Block::product(coral_mine(coral_mine_bytes)?))
        .with_block(Block::product(h500(h500_bytes)?))
        .with_block(Block::product(assimilator(assimilator_bytes)?))
        .with_block(Block::product(lecithin(lecithin_bytes)?)))
}

fn product_image(bytes: Vec<u8>) -> ImageBlock {
    ImageBlock::new(ImageSource::from_bytes(bytes))
        .with_alignment(HorizontalAlignment::Center)
        .with_width_mm(Some(PRODUCT_IMAGE_WIDTH_MM))
}

fn science_fact(text: &str) -> RichParagraph {
    RichParagraph::new(vec![
        Span::new("Научный факт: ")
            .bold()
            .colored(palette::SCIENCE_INK),
        Span::new(text).italic().colored(palette::SCIENCE_INK),
    ])
}

fn coral_mine(bytes: Vec<u8>) -> Result<ProductCard, Error> {
    Ok(ProductCard::new(
        "CORAL-MINE",
        "Живая вода из глубин океана",
        product_image(bytes),
        rich(
            "Измельчённый коралл Санго с острова Окинава (Япония) — места, где люди живут дольше всех на планете.",
        )?,
        BulletList::new()
            .with_item(rich("Ощелачивает воду до pH 8.5-9")?)
            .with_item(rich("Насыщает 70+ минералами в ионной форме")?)
            .with_item(rich("Улучшает гидратацию клеток на 40%")?),
        science_fact(
            "Жители Окинавы пьют воду, проходящую через коралловые породы. Средняя продолжительность жизни — 87 лет.",
        ),
        CallToAction::new("КУПИТЬ CORAL-MINE", "https://coralclub.us/shop/coral-mine.html"),
    ))
}

fn h500(bytes: Vec<u8>) -> Result<ProductCard, Error> {
    Ok(ProductCard::new(
        "H-500",
        "Самый мощный антиоксидант в мире",
        product_image(bytes),
        rich(
            "Гидрид кремния — донор электронов, который нейтрализует свободные радикалы эффективнее витамина C в 100 раз.",
        )?,
        BulletList::new()
            .with_item(rich("Защищает клетки от окислительного стресса")?)
            .with_item(rich("Даёт чистую энергию без кофеина")?)
            .with_item(rich("Ускоряет восстановление после тренировок")?),
        science_fact(
            "1 капсула H-500 = антиоксидантная сила 10,000 стаканов апельсинового сока.",
        ),
        CallToAction::new("КУПИТЬ H-500", "https://coralclub.us/shop/h-500.html"),
    ))
}

fn assimilator(bytes: Vec<u8>) -> Result<ProductCard, Error> {
    Ok(ProductCard::new(
        "ASSIMILATOR",
        "Ферменты для идеального пищеварения",
        product_image(bytes),
        rich(
            "Комплекс растительных ферментов + витамины A и D. Расщепляет пищу полностью, не оставляя шансов гниению.",
        )?,
        BulletList::new()
            .with_item(rich("Расщепляет белки, жиры, углеводы")?)
            .with_item(rich("Предотвращает вздутие и тяжесть")?)
            .with_item(rich("Снимает нагрузку с поджелудочной")?),
        science_fact(
            "После 25 лет выработка ферментов падает на 13% каждые 10 лет. К 50 годам у тебя вдвое меньше, чем нужно.",
        ),
        CallToAction::new(
            "КУПИТЬ ASSIMILATOR",
            "https://coralclub.us/shop/assimilator.html",
        ),
    ))
}

fn lecithin(bytes: Vec<u8>) -> Result<ProductCard, Error> {
    Ok(ProductCard::new(
        "CORAL LECITHIN",
        "Защита печени и мозга",
        product_image(bytes),
        rich("Фосфолипиды из соевых бобов — строительный материал для клеточных мембран.")?,
        BulletList::new()
            .with_item(rich("Защищает клетки печени от токсинов")?)
            .with_item(rich("Помогает выводить жирорастворимые яды")?)
            .with_item(rich("Улучшает память и концентрацию")?),
        science_fact(
            "Печень на 65% состоит из лецитина. При дефиците развивается жировой гепатоз.",
        ),
        CallToAction::new(
            "КУПИТЬ CORAL LECITHIN",
            "https://coralclub.us/shop/coral-lecithin.html",
        ),
    ))
}

fn results_section() -> Section {
    Section::new("Результаты по дням")
        .with_identifier(Some("results".to_string()))
        .with_block(Block::Table(
            ResultsTable::new("Срок", "Что почувствуешь")
                .with_row("День 3-5", "Уходит вздутие, лёгкость после еды")
                .with_row("День 7-10", "Больше энергии, глубже сон")
                .with_row("День 14-21", "Кожа чище, отёки уходят")
                .with_row("День 30", "Минус 2-5 кг, ясная голова"),
        ))
}

fn pricing_section() -> Result<Section, Error> {
    let note = rich("**И эта скидка действует ПОЖИЗНЕННО**")?.centered();

    Ok(Section::new("Сколько это стоит?")
        .with_identifier(Some("pricing".to_string()))
        .with_block(Block::Price(PriceBox::new(
            "Coral Detox (набор 4 продукта)",
            "$107 в розницу",
            "$85",
            "в клубе",
            "ЭКОНОМИЯ $22",
            note,
        ))))
}

fn membership_section() -> Result<Section, Error> {
    let benefits = BulletList::new()
        .with_item(rich("**Регистрация занимает 2 минуты**")?)
        .with_item(rich("**Никаких ежемесячных платежей**")?)
        .with_item(rich("**Никаких обязательств покупать**")?)
        .with_item(rich("**Скидка 20% активируется мгновенно**")?)
        .with_item(rich("**Действует на ВСЕ 500+ продуктов навсегда**")?);

    let perks = BulletList::new()
        .with_item(rich("**20% скидка** на все продукты")?)
        .with_item(rich("**Бонусы за покупки** — конвертируются в продукты")?)
        .with_item(rich("**Обучающие вебинары** от врачей")?)
        .with_item(rich("**Единый аккаунт** работает в 40 странах")?)
        .with_item(rich("**Семейная скидка** для близких")?);

    Ok(Section::new("Как получить скидку 20%?")
        .with_identifier(Some("membership".to_string()))
        .with_block(Block::subheading("Вступи в Coral Club — это БЕСПЛАТНО"))
        .with_block(Block::Bullets(benefits))
        .with_block(Block::subheading("Что ещё даёт членство?"))
        .with_block(Block::Bullets(perks)))
}

fn action_section() -> Section {
    let urgency = RichParagraph::new(vec![Span::new(
        "Каждый день без детокса — это ещё один день, когда токсины разрушают твоё тело.",
    )])
    .centered()
    .with_size(14);

    Section::new("ДЕЙСТВУЙ СЕЙЧАС")
        .with_identifier(Some("action".to_string()))
        .with_block(Block::Paragraph(urgency))
        .with_block(Block::Cta(
            CallToAction::new(
                "ПОЛУЧИТЬ СКИДКУ 20% — РЕГИСТРАЦИЯ",
                "https://coralclub.us/registration",
            )
            .emphasized(),
        ))
        .with_block(Block::Cta(
            CallToAction::new("ЗАКАЗАТЬ CORAL DETOX", "https://coralclub.us/shop/coral-detox.html")
                .with_accent(CtaAccent::Secondary),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_images() -> GuideImages {
        // The model stores raw bytes without decoding, so placeholders are
        // enough for structural assertions.
        GuideImages {
            cover: vec![0],
            coral_mine: vec![0],
            h500: vec![0],
            assimilator: vec![0],
            lecithin: vec![0],
        }
    }

    #[test]
    fn guide_has_cover_and_six_sections() {
        let builder = leadmagnet(stub_images()).expect("guide content is valid");
        assert!(builder.cover().is_some());

        let titles: Vec<&str> = builder
            .sections()
            .iter()
            .map(|section| section.title())
            .collect();
        assert_eq!(
            titles,
            [
                "ВНИМАНИЕ: Это касается ТЕБЯ",
                "Решение существует",
                "Результаты по дням",
                "Сколько это стоит?",
                "Как получить скидку 20%?",
                "ДЕЙСТВУЙ СЕЙЧАС",
            ]
        );
    }

    #[test]
    fn every_section_has_an_outline_identifier() {
        let builder = leadmagnet(stub_images()).expect("guide content is valid");
        let mut identifiers: Vec<&str> = builder
            .sections()
            .iter()
            .map(|section| section.identifier().expect("identifier set"))
            .collect();
        identifiers.sort_unstable();
        identifiers.dedup();
        assert_eq!(identifiers.len(), builder.sections().len());
    }

    #[test]
    fn solution_section_carries_four_products() {
        let builder = leadmagnet(stub_images()).expect("guide content is valid");
        let solution = &builder.sections()[1];
        let products = solution
            .blocks()
            .iter()
            .filter(|block| matches!(block, Block::Product(_)))
            .count();
        assert_eq!(products, 4);
    }

    #[test]
    fn results_table_covers_the_thirty_days() {
        let builder = leadmagnet(stub_images()).expect("guide content is valid");
        let results = &builder.sections()[2];
        let Some(Block::Table(table)) = results.blocks().first() else {
            panic!("results section starts with the table");
        };
        assert_eq!(table.rows().len(), 4);
        assert_eq!(table.rows()[3].0, "День 30");
    }
}
