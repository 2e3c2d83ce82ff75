//! Localized UI strings.
//!
//! Lookup falls back to English, then to the key itself. Templates use
//! `{{ name }}` placeholders (surrounding whitespace allowed).

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// A supported UI language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Arabic];

    pub fn is_rtl(self) -> bool {
        self == Language::Arabic
    }

    /// The next language in the selector, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Language::English => EN,
            Language::Arabic => AR,
        }
    }
}

/// Translates keys for one language.
#[derive(Debug, Clone, Copy)]
pub struct Localizer {
    lang: Language,
}

impl Localizer {
    pub fn new(lang: Language) -> Self {
        Self { lang }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// Translate a key with no placeholders.
    pub fn t(&self, key: &str) -> String {
        self.translate(key, &[])
    }

    /// Translate a key, substituting `{{ name }}` placeholders.
    pub fn translate(&self, key: &str, replacements: &[(&str, &str)]) -> String {
        let template = lookup(self.lang.table(), key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key);
        if replacements.is_empty() {
            return template.to_string();
        }
        placeholder()
            .replace_all(template, |caps: &Captures| {
                replacements
                    .iter()
                    .find(|(name, _)| *name == &caps[1])
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("valid placeholder regex"))
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

const EN: &[(&str, &str)] = &[
    ("app.title", "Pro Bookmark Manager"),
    ("modal.settings.title", "Settings"),
    ("settings.gridSize", "Grid Size:"),
    ("settings.gridSmall", "Small"),
    ("settings.gridMedium", "Medium"),
    ("settings.gridLarge", "Large"),
    ("settings.defaultEngine", "Default Search Engine:"),
    ("settings.engine.google", "Google"),
    ("settings.engine.bing", "Bing"),
    ("settings.engine.duckduckgo", "DuckDuckGo"),
    ("settings.engine.yahoo", "Yahoo"),
    ("settings.showMostVisited", "Show Most Visited:"),
    ("settings.showRecentlyAdded", "Show Recently Added:"),
    ("settings.animationsEnabled", "Enable Animations:"),
    ("settings.language", "Language:"),
    ("settings.save", "Save Settings"),
    ("settings.reset", "Reset to Default"),
    ("modal.addBookmark.title", "Add Bookmark"),
    ("modal.fields.title", "Title:"),
    ("modal.fields.url", "URL:"),
    ("modal.fields.folder", "Folder:"),
    ("modal.fields.selectFolder", "Select folder..."),
    ("modal.placeholders.title", "Enter bookmark title"),
    ("modal.placeholders.url", "https://example.com"),
    ("modal.addBookmark.save", "Save Bookmark"),
    ("modal.editBookmark.title", "Edit Bookmark"),
    ("modal.editBookmark.update", "Update Bookmark"),
    ("modal.editBookmark.delete", "Delete Bookmark"),
    ("common.cancel", "Cancel"),
    ("header.title", "Pro Bookmark Manager"),
    ("language.english", "English"),
    ("language.arabic", "العربية"),
    ("search.placeholder", "Search {{engine}} or type a URL"),
    ("tabs.bookmarks", "Bookmarks"),
    ("tabs.mostVisited", "Most Visited"),
    ("tabs.recentlyAdded", "Recently Added"),
    ("tabs.all", "All"),
    ("breadcrumbs.home", "Home"),
    ("breadcrumbs.all", "All Bookmarks"),
    ("breadcrumbs.search", "Search: \"{{term}}\""),
    ("bookmarkSearch.placeholder", "Search your bookmarks..."),
    ("sort.default", "Original Order"),
    ("sort.name", "Sort by Name"),
    ("sort.date", "Sort by Date"),
    ("sort.url", "Sort by URL"),
    ("filter.all", "All Bookmarks"),
    ("filter.today", "Added Today"),
    ("filter.week", "This Week"),
    ("filter.month", "This Month"),
    ("view.gridTooltip", "Grid View"),
    ("view.listTooltip", "List View"),
    ("loading.message", "Loading bookmarks..."),
    ("backToTop.tooltip", "Go to top"),
    ("status.count", "{{count}} bookmarks"),
    ("help.title", "Keyboard Shortcuts"),
    ("help.category.browse", "Browse"),
    ("help.category.bookmarks", "Bookmarks"),
    ("help.category.search", "Search & Sort"),
    ("help.category.general", "General"),
    ("help.moveCards", "Move between cards"),
    ("help.quickViews", "Bookmarks / Most visited / Recently added"),
    ("help.folderTabs", "Previous / next folder tab"),
    ("help.subfolderTabs", "Previous / next subfolder tab"),
    ("help.breadcrumbUp", "Up one breadcrumb"),
    ("help.breadcrumbHome", "Home breadcrumb"),
    ("help.backToTop", "Back to top"),
    ("help.openHere", "Open here (leaves the app)"),
    ("help.openNewTab", "Open in a new tab"),
    ("help.add", "Add bookmark"),
    ("help.edit", "Edit bookmark"),
    ("help.delete", "Delete bookmark"),
    ("help.reorder", "Move card forward / back"),
    ("help.webSearch", "Web search"),
    ("help.bookmarkSearch", "Search bookmarks"),
    ("help.suggestion", "Pick a suggestion"),
    ("help.sort", "Cycle sort order"),
    ("help.filter", "Cycle date filter"),
    ("help.layout", "Grid / list layout"),
    ("help.darkMode", "Toggle dark mode"),
    ("help.language", "Switch language"),
    ("help.settings", "Settings"),
    ("help.toggleHelp", "Toggle this help overlay"),
    ("help.escape", "Close dialog / leave input"),
    ("help.quit", "Quit"),
    ("help.closeHint", "Press ? or Esc to close"),
    ("toast.settingsSaved", "Settings saved successfully!"),
    ("toast.errorLoadingBookmarks", "Error loading bookmarks"),
    ("toast.bookmarkCreated", "Bookmark created successfully!"),
    ("toast.bookmarkCreateError", "Error creating bookmark: {{message}}"),
    ("toast.bookmarkUpdated", "Bookmark updated successfully!"),
    ("toast.bookmarkUpdateError", "Error updating bookmark: {{message}}"),
    ("toast.bookmarkDeleted", "Bookmark deleted successfully!"),
    ("toast.bookmarkDeleteError", "Error deleting bookmark: {{message}}"),
    ("toast.bookmarkDeleteGenericError", "Error deleting bookmark"),
    ("toast.fillTitleAndUrl", "Please fill in title and URL"),
    ("toast.bookmarkReordered", "Bookmark position updated!"),
    ("toast.openFailed", "Could not open {{url}}"),
    ("toast.bookmarksRefreshed", "Bookmarks changed elsewhere, list refreshed"),
    ("empty.noBookmarks", "No bookmarks found."),
    ("bookmark.untitled", "Untitled"),
    ("bookmark.unknownHost", "unknown"),
    ("confirm.deleteBookmark", "Are you sure you want to delete this bookmark?"),
    ("bookmark.action.open", "Open bookmark"),
    ("bookmark.action.edit", "Edit bookmark"),
    ("bookmark.action.delete", "Delete bookmark"),
];

const AR: &[(&str, &str)] = &[
    ("app.title", "مدير العلامات المحترف"),
    ("modal.settings.title", "الإعدادات"),
    ("settings.gridSize", "حجم الشبكة:"),
    ("settings.gridSmall", "صغير"),
    ("settings.gridMedium", "متوسط"),
    ("settings.gridLarge", "كبير"),
    ("settings.defaultEngine", "محرك البحث الافتراضي:"),
    ("settings.engine.google", "جوجل"),
    ("settings.engine.bing", "بينغ"),
    ("settings.engine.duckduckgo", "دك دك غو"),
    ("settings.engine.yahoo", "ياهو"),
    ("settings.showMostVisited", "عرض الأكثر زيارة:"),
    ("settings.showRecentlyAdded", "عرض المضافة حديثًا:"),
    ("settings.animationsEnabled", "تفعيل الحركات:"),
    ("settings.language", "اللغة:"),
    ("settings.save", "حفظ الإعدادات"),
    ("settings.reset", "إعادة الضبط للوضع الافتراضي"),
    ("modal.addBookmark.title", "إضافة علامة مرجعية"),
    ("modal.fields.title", "العنوان:"),
    ("modal.fields.url", "الرابط:"),
    ("modal.fields.folder", "المجلد:"),
    ("modal.fields.selectFolder", "اختر مجلدًا..."),
    ("modal.placeholders.title", "أدخل عنوان العلامة المرجعية"),
    ("modal.placeholders.url", "https://example.com"),
    ("modal.addBookmark.save", "حفظ العلامة"),
    ("modal.editBookmark.title", "تحرير العلامة المرجعية"),
    ("modal.editBookmark.update", "تحديث العلامة"),
    ("modal.editBookmark.delete", "حذف العلامة"),
    ("common.cancel", "إلغاء"),
    ("header.title", "مدير العلامات المحترف"),
    ("language.english", "English"),
    ("language.arabic", "العربية"),
    ("search.placeholder", "ابحث في {{engine}} أو اكتب عنوان URL"),
    ("tabs.bookmarks", "العلامات"),
    ("tabs.mostVisited", "الأكثر زيارة"),
    ("tabs.recentlyAdded", "المضافة حديثًا"),
    ("tabs.all", "الكل"),
    ("breadcrumbs.home", "الصفحة الرئيسية"),
    ("breadcrumbs.all", "جميع العلامات"),
    ("breadcrumbs.search", "نتائج البحث: \"{{term}}\""),
    ("bookmarkSearch.placeholder", "ابحث في علاماتك..."),
    ("sort.default", "الترتيب الأصلي"),
    ("sort.name", "ترتيب حسب الاسم"),
    ("sort.date", "ترتيب حسب التاريخ"),
    ("sort.url", "ترتيب حسب الرابط"),
    ("filter.all", "جميع العلامات"),
    ("filter.today", "أضيفت اليوم"),
    ("filter.week", "هذا الأسبوع"),
    ("filter.month", "هذا الشهر"),
    ("view.gridTooltip", "عرض الشبكة"),
    ("view.listTooltip", "عرض القائمة"),
    ("loading.message", "جارٍ تحميل العلامات..."),
    ("backToTop.tooltip", "إلى الأعلى"),
    ("status.count", "{{count}} علامة"),
    ("help.title", "اختصارات لوحة المفاتيح"),
    ("help.category.browse", "التصفح"),
    ("help.category.bookmarks", "العلامات"),
    ("help.category.search", "البحث والترتيب"),
    ("help.category.general", "عام"),
    ("help.moveCards", "التنقل بين البطاقات"),
    ("help.quickViews", "العلامات / الأكثر زيارة / المضافة حديثاً"),
    ("help.folderTabs", "تبويب المجلد السابق / التالي"),
    ("help.subfolderTabs", "تبويب المجلد الفرعي السابق / التالي"),
    ("help.breadcrumbUp", "الرجوع خطوة في المسار"),
    ("help.breadcrumbHome", "بداية المسار"),
    ("help.backToTop", "العودة إلى الأعلى"),
    ("help.openHere", "فتح هنا (يغادر التطبيق)"),
    ("help.openNewTab", "فتح في علامة تبويب جديدة"),
    ("help.add", "إضافة علامة"),
    ("help.edit", "تعديل العلامة"),
    ("help.delete", "حذف العلامة"),
    ("help.reorder", "تحريك البطاقة للأمام / للخلف"),
    ("help.webSearch", "البحث في الويب"),
    ("help.bookmarkSearch", "البحث في العلامات"),
    ("help.suggestion", "اختيار اقتراح"),
    ("help.sort", "تبديل ترتيب الفرز"),
    ("help.filter", "تبديل فلتر التاريخ"),
    ("help.layout", "عرض الشبكة / القائمة"),
    ("help.darkMode", "تبديل الوضع الداكن"),
    ("help.language", "تغيير اللغة"),
    ("help.settings", "الإعدادات"),
    ("help.toggleHelp", "إظهار أو إخفاء هذه المساعدة"),
    ("help.escape", "إغلاق النافذة / مغادرة الحقل"),
    ("help.quit", "خروج"),
    ("help.closeHint", "اضغط ? أو Esc للإغلاق"),
    ("toast.settingsSaved", "تم حفظ الإعدادات بنجاح!"),
    ("toast.errorLoadingBookmarks", "حدث خطأ أثناء تحميل العلامات"),
    ("toast.bookmarkCreated", "تم إنشاء العلامة بنجاح!"),
    ("toast.bookmarkCreateError", "حدث خطأ عند إنشاء العلامة: {{message}}"),
    ("toast.bookmarkUpdated", "تم تحديث العلامة بنجاح!"),
    ("toast.bookmarkUpdateError", "حدث خطأ عند تحديث العلامة: {{message}}"),
    ("toast.bookmarkDeleted", "تم حذف العلامة بنجاح!"),
    ("toast.bookmarkDeleteError", "حدث خطأ عند حذف العلامة: {{message}}"),
    ("toast.bookmarkDeleteGenericError", "حدث خطأ عند حذف العلامة"),
    ("toast.fillTitleAndUrl", "يرجى إدخال العنوان والرابط"),
    ("toast.bookmarkReordered", "تم تحديث موضع العلامة!"),
    ("toast.openFailed", "تعذر فتح {{url}}"),
    ("toast.bookmarksRefreshed", "تغيرت العلامات خارجياً، تم تحديث القائمة"),
    ("empty.noBookmarks", "لا توجد علامات."),
    ("bookmark.untitled", "بدون عنوان"),
    ("bookmark.unknownHost", "غير معروف"),
    ("confirm.deleteBookmark", "هل أنت متأكد أنك تريد حذف هذه العلامة؟"),
    ("bookmark.action.open", "فتح العلامة"),
    ("bookmark.action.edit", "تحرير العلامة"),
    ("bookmark.action.delete", "حذف العلامة"),
];
